use crate::app::AppState;
use crate::domain::format_remaining;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw a bordered, centered dialog with the given lines
fn render_dialog(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = lines.len() as u16 + 2;
    let modal_area = create_modal_area(area, height);

    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), modal_title_style()))
        .borders(Borders::ALL)
        .style(modal_bg_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, modal_area);
}

/// "Ending soon" warning
pub fn render_warning_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(warning) = &app.warning else {
        return;
    };
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(warning.title.as_str(), modal_title_style())),
        Line::raw(format!("ends in {}", format_remaining(warning.remaining))),
        Line::raw(""),
        Line::styled("[Enter] OK", hint_style()),
    ];
    render_dialog(f, area, "Time almost up", lines);
}

/// "Did you finish?" prompt with the numbered snooze choices
pub fn render_completion_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(prompt) = &app.completion else {
        return;
    };

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(prompt.title.as_str(), modal_title_style())),
        Line::raw("Time is up. Did you complete this task?"),
        Line::raw(""),
        Line::raw("[y] Yes    [n] No"),
    ];

    if !app.snooze_options.is_empty() {
        let choices = app
            .snooze_options
            .iter()
            .take(9)
            .enumerate()
            .map(|(index, minutes)| format!("[{}] {}m", index + 1, minutes))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!("Snooze: {}", choices)));
    }

    render_dialog(f, area, "Task finished", lines);
}

/// Delete confirmation
pub fn render_delete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let title = app.pending_delete_title().unwrap_or_default();
    let lines = vec![
        Line::raw(""),
        Line::raw(format!("Delete \"{}\"?", title)),
        Line::raw(""),
        Line::styled("[y] Delete    [n] Cancel", hint_style()),
    ];
    render_dialog(f, area, "Confirm", lines);
}
