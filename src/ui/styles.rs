use crate::domain::{Priority, TaskStatus};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Countdown style; turns red once the warning threshold is reached
pub fn countdown_style(warning: bool) -> Style {
    if warning {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    }
}

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

pub fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Completed => Style::default().fg(Color::Green),
        TaskStatus::InProgress => Style::default().fg(Color::Magenta),
        TaskStatus::OnHold => Style::default().fg(Color::Yellow),
        TaskStatus::Cancelled | TaskStatus::NotStarted => Style::default().fg(Color::Gray),
    }
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Completion gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}
