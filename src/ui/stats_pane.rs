use crate::app::AppState;
use crate::domain::Priority;
use crate::ui::styles::{border_style, default_style, gauge_style, priority_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render task statistics: completion gauge plus per-priority counts
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Stats ", title_style()))
        .borders(Borders::ALL)
        .border_style(border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let stats = &app.stats;
    let ratio = (stats.completion_rate / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(ratio)
        .label(format!(
            "{}/{} done ({:.0}%)",
            stats.completed, stats.total, stats.completion_rate
        ));
    f.render_widget(gauge, chunks[0]);

    let mut lines = Vec::new();
    for priority in Priority::all() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", priority.as_str()), priority_style(*priority)),
            Span::styled(stats.by_priority.get(*priority).to_string(), default_style()),
        ]));
    }
    f.render_widget(Paragraph::new(lines), chunks[2]);
}
