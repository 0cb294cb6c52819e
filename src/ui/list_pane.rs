use crate::app::AppState;
use crate::domain::{Priority, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, priority_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!!",
        Priority::Medium => "!! ",
        Priority::Low => "!  ",
    }
}

fn task_line<'a>(task: &'a Task, is_current: bool) -> Line<'a> {
    let check = if task.is_completed() { "[x]" } else { "[ ]" };
    let active = if is_current { "▶ " } else { "  " };
    let text_style = if task.is_completed() {
        done_style()
    } else {
        default_style()
    };

    Line::from(vec![
        Span::raw(active),
        Span::raw(format!("{} ", check)),
        Span::raw(format!("{}-{} ", task.start_time, task.end_time)),
        Span::styled(priority_marker(task.priority), priority_style(task.priority)),
        Span::raw(" "),
        Span::styled(task.title.as_str(), text_style),
    ])
}

/// Render the task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let visible = app.visible_tasks();
    let current_id = app.current.as_ref().map(|task| task.id);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let item = ListItem::new(task_line(task, Some(task.id) == current_id));
            if index == app.selected_index {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();

    let title = if app.show_all_tasks {
        format!(" All Tasks ({}) ", visible.len())
    } else {
        format!(" Open Tasks ({}) ", visible.len())
    };

    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(title, title_style()))
            .borders(Borders::ALL)
            .border_style(border_style()),
    );

    f.render_widget(list, area);
}
