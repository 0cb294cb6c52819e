use crate::app::{AppState, FIELD_END, FIELD_PRIORITY, FIELD_START, FIELD_STATUS, FIELD_TITLE};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One labelled form row; the focused row gets a cursor (text) or arrows (choice)
fn field_lines<'a>(label: &'a str, value: &'a str, focused: bool, choice: bool) -> [Line<'a>; 2] {
    let label_line = if focused {
        Line::raw(format!("{}: (editing)", label))
    } else {
        Line::raw(format!("{}:", label))
    };

    let value_line = match (focused, choice) {
        (true, true) => Line::from(vec![
            Span::raw("> "),
            Span::styled(format!("◀ {} ▶", value), modal_title_style()),
        ]),
        (true, false) => Line::from(vec![
            Span::raw("> "),
            Span::styled(value, modal_title_style()),
            Span::styled("█", modal_title_style()),
        ]),
        (false, _) => Line::from(vec![Span::raw("> "), Span::raw(value)]),
    };

    [label_line, value_line]
}

/// Render the add/edit task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    let fields: [(&str, &str, usize, bool); 5] = [
        ("Title", form.title.as_str(), FIELD_TITLE, false),
        ("Start (HH:MM)", form.start.as_str(), FIELD_START, false),
        ("End (HH:MM)", form.end.as_str(), FIELD_END, false),
        ("Priority", form.priority.as_str(), FIELD_PRIORITY, true),
        ("Status", form.status.as_str(), FIELD_STATUS, true),
    ];
    for (label, value, field, choice) in fields {
        lines.extend(field_lines(label, value, form.editing_field == field, choice));
    }

    lines.push(Line::raw(""));
    match &form.error {
        Some(error) => lines.push(Line::styled(error.as_str(), error_style())),
        None => lines.push(Line::styled("Enter to save, Esc to cancel", hint_style())),
    }

    let title_text = if form.task_id.is_some() {
        " Edit Task "
    } else {
        " Add Task "
    };

    let modal_area = create_modal_area(area, lines.len() as u16 + 2);
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(Span::styled(title_text, modal_title_style()))
        .borders(Borders::ALL)
        .style(modal_bg_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
