use crate::app::AppState;
use crate::domain::{format_remaining, Task};
use crate::reminder::Phase;
use crate::ui::styles::{
    border_style, countdown_style, default_style, hint_style, priority_style, status_style,
    title_style,
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn task_lines(task: &Task, remaining: u32, warning: bool) -> Vec<Line<'_>> {
    vec![
        Line::raw(""),
        Line::from(Span::styled(task.title.as_str(), title_style())),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Window:    ", hint_style()),
            Span::styled(
                format!("{} - {}", task.start_time, task.end_time),
                default_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Remaining: ", hint_style()),
            Span::styled(format_remaining(remaining), countdown_style(warning)),
        ]),
        Line::from(vec![
            Span::styled("Priority:  ", hint_style()),
            Span::styled(task.priority.as_str(), priority_style(task.priority)),
        ]),
        Line::from(vec![
            Span::styled("Status:    ", hint_style()),
            Span::styled(task.status.as_str(), status_style(task.status)),
        ]),
    ]
}

/// Render the pane showing the task whose window contains "now"
pub fn render_current_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let lines = match (&app.current, app.remaining) {
        (Some(task), Some(remaining)) => {
            // Red from the warning onwards
            let warning = matches!(app.phase(), Some(Phase::Warned | Phase::Resolved));
            task_lines(task, remaining, warning)
        }
        _ => vec![
            Line::raw(""),
            Line::styled("No active task right now", hint_style()),
        ],
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" Now {} ", app.now.format("%H:%M")),
            title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(border_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
