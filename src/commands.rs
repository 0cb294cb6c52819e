//! Non-interactive subcommands. Each one runs a single store operation and
//! prints the result, so they can be scripted or used from a status bar.

use crate::domain::{
    format_remaining, minute_of_day, remaining_minutes, select_current, NewTask, Task, TaskPatch,
};
use crate::persistence::{find_by_prefix, TaskStore};
use crate::report::calculate_task_stats;
use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use tracing::info;

/// Length of the id prefix shown in listings
const SHORT_ID_LEN: usize = 8;

fn short_id(task: &Task) -> String {
    task.id.to_string()[..SHORT_ID_LEN].to_string()
}

fn describe(task: &Task) -> String {
    let check = if task.is_completed() { "x" } else { " " };
    format!(
        "[{}] {}  {}-{}  {:<6}  {:<11}  {}",
        check,
        short_id(task),
        task.start_time,
        task.end_time,
        task.priority.as_str(),
        task.status.as_str(),
        task.title
    )
}

/// Resolve an id prefix to exactly one live task
fn resolve(store: &mut dyn TaskStore, prefix: &str, now: DateTime<Local>) -> Result<Task> {
    let tasks = store.list(now)?;
    let matches = find_by_prefix(&tasks, prefix);
    match matches.as_slice() {
        [task] => Ok((*task).clone()),
        [] => bail!("No task matches id '{}'", prefix),
        _ => bail!(
            "Id '{}' is ambiguous ({} tasks match); use a longer prefix",
            prefix,
            matches.len()
        ),
    }
}

pub fn add(
    store: &mut dyn TaskStore,
    fields: NewTask,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let task = store.create(fields, now)?;
    info!(task_id = %task.id, title = %task.title, "task added");
    writeln!(out, "Added {}", describe(&task))?;
    Ok(())
}

pub fn list(store: &mut dyn TaskStore, now: DateTime<Local>, out: &mut impl Write) -> Result<()> {
    let tasks = store.list(now)?;
    if tasks.is_empty() {
        writeln!(out, "No tasks.")?;
        return Ok(());
    }
    for task in &tasks {
        writeln!(out, "{}", describe(task))?;
    }
    Ok(())
}

pub fn current(store: &mut dyn TaskStore, now: DateTime<Local>, out: &mut impl Write) -> Result<()> {
    let tasks = store.list(now)?;
    match select_current(&tasks, &now) {
        Some(task) => {
            let remaining = remaining_minutes(minute_of_day(&now), task.end_time.minutes());
            writeln!(
                out,
                "{} ({}-{}, {} left)",
                task.title,
                task.start_time,
                task.end_time,
                format_remaining(remaining)
            )?;
        }
        None => writeln!(out, "No active task.")?,
    }
    Ok(())
}

/// Answer the completion question for a task from the command line
pub fn done(
    store: &mut dyn TaskStore,
    prefix: &str,
    decision: bool,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let task = resolve(store, prefix, now)?;
    if let Some(updated) = store.update(task.id, TaskPatch::completion(decision, now))? {
        info!(task_id = %updated.id, completed = decision, "completion set");
        writeln!(out, "Updated {}", describe(&updated))?;
    }
    Ok(())
}

pub fn snooze(
    store: &mut dyn TaskStore,
    prefix: &str,
    minutes: u32,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    if minutes == 0 {
        bail!("Snooze needs at least one minute");
    }
    let task = resolve(store, prefix, now)?;
    if let Some(updated) = store.update(task.id, TaskPatch::snooze(minutes, &now))? {
        info!(task_id = %updated.id, minutes, "task snoozed");
        writeln!(out, "Snoozed {}", describe(&updated))?;
    }
    Ok(())
}

pub fn delete(
    store: &mut dyn TaskStore,
    prefix: &str,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let task = resolve(store, prefix, now)?;
    if store.delete(task.id)? {
        info!(task_id = %task.id, "task deleted");
        writeln!(out, "Deleted {}", describe(&task))?;
    }
    Ok(())
}

pub fn stats(
    store: &mut dyn TaskStore,
    now: DateTime<Local>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let tasks = store.list(now)?;
    let stats = calculate_task_stats(&tasks);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }
    writeln!(out, "Total:      {}", stats.total)?;
    writeln!(out, "Completed:  {}", stats.completed)?;
    writeln!(out, "Completion: {:.1}%", stats.completion_rate)?;
    writeln!(
        out,
        "Priority:   high {}, medium {}, low {}",
        stats.by_priority.high, stats.by_priority.medium, stats.by_priority.low
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{at, clock};
    use crate::domain::{Priority, TaskStatus};
    use crate::persistence::store::MemoryTaskStore;
    use pretty_assertions::assert_eq;

    fn fields(title: &str, start: &str, end: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            start_time: clock(start),
            end_time: clock(end),
            priority: Priority::Medium,
            status: TaskStatus::InProgress,
        }
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        run(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_and_list() {
        let mut store = MemoryTaskStore::default();
        let added = output(|out| add(&mut store, fields("Write", "09:00", "10:00"), at(8, 0), out));
        assert!(added.starts_with("Added [ ]"));

        let listed = output(|out| list(&mut store, at(8, 0), out));
        assert_eq!(listed.lines().count(), 1);
        assert!(listed.contains("09:00-10:00"));
        assert!(listed.contains("Write"));
    }

    #[test]
    fn test_list_empty() {
        let mut store = MemoryTaskStore::default();
        assert_eq!(output(|out| list(&mut store, at(8, 0), out)), "No tasks.\n");
    }

    #[test]
    fn test_current_reports_remaining() {
        let mut store = MemoryTaskStore::default();
        store.create(fields("Focus", "09:00", "10:30"), at(8, 0)).unwrap();

        let text = output(|out| current(&mut store, at(9, 15), out));
        assert_eq!(text, "Focus (09:00-10:30, 1h 15m left)\n");

        let idle = output(|out| current(&mut store, at(11, 0), out));
        assert_eq!(idle, "No active task.\n");
    }

    #[test]
    fn test_done_by_prefix() {
        let mut store = MemoryTaskStore::default();
        let task = store.create(fields("Focus", "09:00", "10:00"), at(8, 0)).unwrap();
        let prefix = task.id.to_string()[..6].to_string();

        output(|out| done(&mut store, &prefix, true, at(10, 0), out));
        assert!(store.tasks[0].is_completed());
        assert_eq!(store.tasks[0].status, TaskStatus::Completed);

        output(|out| done(&mut store, &prefix, false, at(10, 1), out));
        assert!(!store.tasks[0].is_completed());
    }

    #[test]
    fn test_unknown_prefix_is_an_error() {
        let mut store = MemoryTaskStore::default();
        store.create(fields("Focus", "09:00", "10:00"), at(8, 0)).unwrap();
        let mut out = Vec::new();
        let err = delete(&mut store, "not-an-id", at(9, 0), &mut out).unwrap_err();
        assert!(err.to_string().contains("No task matches"));
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn test_snooze_resets_window() {
        let mut store = MemoryTaskStore::default();
        let task = store.create(fields("Standup", "09:00", "09:30"), at(8, 0)).unwrap();
        let id = task.id.to_string();

        output(|out| snooze(&mut store, &id, 15, at(9, 31), out));
        assert_eq!(store.tasks[0].start_time, clock("09:31"));
        assert_eq!(store.tasks[0].end_time, clock("09:46"));

        let mut out = Vec::new();
        assert!(snooze(&mut store, &id, 0, at(9, 31), &mut out).is_err());
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryTaskStore::default();
        let task = store.create(fields("Gone", "09:00", "10:00"), at(8, 0)).unwrap();
        let text = output(|out| delete(&mut store, &task.id.to_string(), at(9, 0), out));
        assert!(text.starts_with("Deleted"));
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn test_stats_text_and_json() {
        let mut store = MemoryTaskStore::default();
        let task = store.create(fields("A", "09:00", "10:00"), at(8, 0)).unwrap();
        store.create(fields("B", "10:00", "11:00"), at(8, 0)).unwrap();
        store
            .update(task.id, TaskPatch::completion(true, at(10, 0)))
            .unwrap();

        let text = output(|out| stats(&mut store, at(12, 0), false, out));
        assert!(text.contains("Completion: 50.0%"));
        assert!(text.contains("medium 2"));

        let json = output(|out| stats(&mut store, at(12, 0), true, out));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["completed"], 1);
        assert_eq!(value["by_priority"]["medium"], 2);
    }
}
