use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub list_area: Rect,
    pub current_area: Rect,
    pub stats_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: List (55%) | Current task (45%), with stats under the
///   current task when shown
/// - Bottom bar: clock and errors (1 row)
pub fn create_layout(area: Rect, show_stats: bool) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Task list
            Constraint::Percentage(45), // Current task (+ stats)
        ])
        .split(main_chunks[1]);

    let (current_area, stats_area) = if show_stats {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(horizontal[1]);
        (right[0], Some(right[1]))
    } else {
        (horizontal[1], None)
    };

    MainLayout {
        keybindings_area: main_chunks[0],
        list_area: horizontal[0],
        current_area,
        stats_area,
        status_area: main_chunks[2],
    }
}

/// Create a centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area, false);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert!(layout.list_area.height > 0);
        assert!(layout.current_area.height > 0);
        assert!(layout.stats_area.is_none());

        let with_stats = create_layout(area, true);
        let stats = with_stats.stats_area.unwrap();
        assert!(stats.height > 0);
        assert!(with_stats.current_area.height < layout.current_area.height);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
