pub mod stats;

pub use stats::{calculate_task_stats, TaskStats};
