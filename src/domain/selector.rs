use super::clock::minute_of_day;
use super::task::Task;
use chrono::{DateTime, Local};

/// Whether `task` may be the current task at `now`
pub fn is_active_at(task: &Task, now: &DateTime<Local>) -> bool {
    if task.is_completed() || !task.status.can_activate() || task.is_snoozed(now) {
        return false;
    }
    let minute = minute_of_day(now);
    task.start_time.minutes() <= minute && minute <= task.end_time.minutes()
}

/// Pick the current task: the first one, in store order, whose window
/// contains `now`. Overlapping windows resolve to the earlier-inserted task.
pub fn select_current<'a>(tasks: &'a [Task], now: &DateTime<Local>) -> Option<&'a Task> {
    tasks.iter().find(|task| is_active_at(task, now))
}
