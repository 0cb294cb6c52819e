use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{error_style, hint_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingTask => Line::from(vec![
            Span::raw(" Tab/↑/↓ field   "),
            Span::raw("←/→ change   "),
            Span::raw("Enter save   "),
            Span::raw("Esc cancel"),
        ]),
        UiMode::CompletionPrompt => Line::from(vec![
            Span::raw(" y done   "),
            Span::raw("n not yet   "),
            Span::raw("1-9 snooze"),
        ]),
        UiMode::Warning => Line::raw(" Esc/Enter dismiss"),
        UiMode::ConfirmDelete => Line::raw(" y delete   n cancel"),
        UiMode::Normal => Line::from(vec![
            Span::raw(" ↑/↓ select   "),
            Span::raw("a add   "),
            Span::raw("e edit   "),
            Span::raw("d done   "),
            Span::raw("x delete   "),
            Span::raw("l show all   "),
            Span::raw("s stats   "),
            Span::raw("q quit"),
        ]),
    };

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the bottom status bar: wall clock and the last error, if any
pub fn render_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.now.format("%a %H:%M:%S")),
        hint_style(),
    )];
    if let Some(err) = &app.last_error {
        spans.push(Span::styled(format!(" {}", err), error_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
