pub mod current_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use current_pane::render_current_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_bar};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_completion_modal, render_delete_modal, render_warning_modal};
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size, app.show_stats);

    render_keybindings(f, app, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_current_pane(f, app, layout.current_area);
    if let Some(stats_area) = layout.stats_area {
        stats_pane::render_stats_pane(f, app, stats_area);
    }
    render_status_bar(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingTask => render_input_form(f, app, size),
        UiMode::ConfirmDelete => render_delete_modal(f, app, size),
        UiMode::Warning => render_warning_modal(f, app, size),
        UiMode::CompletionPrompt => render_completion_modal(f, app, size),
        UiMode::Normal => {}
    }
}
