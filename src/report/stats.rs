use crate::domain::{Priority, Task};
use serde::Serialize;

/// Task counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Summary of the task list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Percentage of completed tasks (0 when there are none)
    pub completion_rate: f64,
    pub by_priority: PriorityCounts,
}

/// Calculate summary statistics over a task list
pub fn calculate_task_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.is_completed()).count();

    let mut by_priority = PriorityCounts::default();
    for task in tasks {
        match task.priority {
            Priority::High => by_priority.high += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::Low => by_priority.low += 1,
        }
    }

    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    TaskStats {
        total,
        completed,
        completion_rate,
        by_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{at, task};
    use crate::domain::TaskPatch;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_list() {
        let stats = calculate_task_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.by_priority, PriorityCounts::default());
    }

    #[test]
    fn test_half_completed() {
        let mut high = task("High", "09:00", "10:00");
        high.priority = Priority::High;
        high.apply(TaskPatch::completion(true, at(10, 0))).unwrap();
        let mut low = task("Low", "10:00", "11:00");
        low.priority = Priority::Low;

        let stats = calculate_task_stats(&[high, low]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(
            stats.by_priority,
            PriorityCounts {
                high: 1,
                medium: 0,
                low: 1
            }
        );
        assert_eq!(stats.by_priority.get(Priority::Medium), 0);
    }

    #[test]
    fn test_completion_rate_fraction() {
        let mut tasks = vec![
            task("A", "09:00", "10:00"),
            task("B", "09:00", "10:00"),
            task("C", "09:00", "10:00"),
        ];
        tasks[0].apply(TaskPatch::completion(true, at(10, 0))).unwrap();

        let stats = calculate_task_stats(&tasks);
        assert!((stats.completion_rate - 33.333).abs() < 0.01);
        assert_eq!(stats.by_priority.medium, 3);
    }
}
