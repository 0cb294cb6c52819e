use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority; also selects the alarm sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lowercase name, as stored and as used for sound file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }

    /// Cycle to the next value (used by the task form)
    pub fn next(&self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::High
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::OnHold => "on-hold",
        }
    }

    /// Cancelled and on-hold tasks never become current
    pub fn can_activate(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::OnHold)
    }

    pub fn next(&self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Cancelled,
            Self::Cancelled => Self::OnHold,
            Self::OnHold => Self::NotStarted,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-started" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "on-hold" => Ok(Self::OnHold),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask,
    ConfirmDelete,
    Warning,
    CompletionPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("Medium".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!(" low ".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::OnHold).unwrap(), "\"on-hold\"");
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"not-started\"").unwrap(),
            TaskStatus::NotStarted
        );
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }

    #[test]
    fn test_status_can_activate() {
        assert!(TaskStatus::NotStarted.can_activate());
        assert!(TaskStatus::InProgress.can_activate());
        assert!(TaskStatus::Completed.can_activate());
        assert!(!TaskStatus::Cancelled.can_activate());
        assert!(!TaskStatus::OnHold.can_activate());
    }

    #[test]
    fn test_cycles_visit_every_value() {
        let mut priority = Priority::High;
        for _ in 0..Priority::all().len() {
            priority = priority.next();
        }
        assert_eq!(priority, Priority::High);

        let mut status = TaskStatus::NotStarted;
        for _ in 0..5 {
            status = status.next();
        }
        assert_eq!(status, TaskStatus::NotStarted);
    }
}
