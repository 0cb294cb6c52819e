pub mod files;
pub mod settings;
pub mod store;

pub use files::{atomic_write, init_project_dir, settings_file, tasks_file, DataDir};
pub use settings::{load_settings, save_settings, Settings};
pub use store::{find_by_prefix, JsonTaskStore, TaskStore};
