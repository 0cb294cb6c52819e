pub mod clock;
pub mod enums;
pub mod selector;
pub mod task;

pub use clock::{
    format_remaining, minute_of_day, remaining_minutes, warning_threshold, ClockTime, FormatError,
};
pub use enums::{Priority, TaskStatus, UiMode};
pub use selector::select_current;
pub use task::{NewTask, Task, TaskError, TaskPatch};
