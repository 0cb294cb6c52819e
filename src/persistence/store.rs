use crate::domain::{NewTask, Task, TaskPatch};
use crate::persistence::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Durable, ordered collection of tasks.
///
/// Iteration order is insertion order; the selector depends on it.
pub trait TaskStore {
    /// All live tasks. Tasks older than the retention window are evicted
    /// as a side effect.
    fn list(&mut self, now: DateTime<Local>) -> Result<Vec<Task>>;

    /// Append a new task; it starts out not completed
    fn create(&mut self, fields: NewTask, now: DateTime<Local>) -> Result<Task>;

    /// Merge `patch` into the task; `None` if no task has that id
    fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>>;

    /// Remove the task; `false` if no task has that id
    fn delete(&mut self, id: Uuid) -> Result<bool>;
}

/// Drop tasks created before `now - retention`, returning how many went
pub fn evict_expired(tasks: &mut Vec<Task>, now: DateTime<Local>, retention: Duration) -> usize {
    let cutoff = now - retention;
    let before = tasks.len();
    tasks.retain(|task| task.created_at >= cutoff);
    before - tasks.len()
}

/// Tasks whose id starts with `prefix` (ids are matched in their hyphenated form)
pub fn find_by_prefix<'a>(tasks: &'a [Task], prefix: &str) -> Vec<&'a Task> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&prefix))
        .collect()
}

/// Task store backed by a single JSON array on disk
pub struct JsonTaskStore {
    path: PathBuf,
    retention: Duration,
}

impl JsonTaskStore {
    pub fn new<P: AsRef<Path>>(path: P, retention: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retention,
        }
    }

    fn load(&self) -> Result<Vec<Task>> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut tasks: Vec<Task> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid task file: {}", self.path.display()))?;
        for task in &mut tasks {
            if task.repair_completion() {
                warn!(task_id = %task.id, "completion flag and timestamp disagreed; repaired");
            }
        }
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        atomic_write(&self.path, &json)
    }
}

impl TaskStore for JsonTaskStore {
    fn list(&mut self, now: DateTime<Local>) -> Result<Vec<Task>> {
        let mut tasks = self.load()?;
        let evicted = evict_expired(&mut tasks, now, self.retention);
        if evicted > 0 {
            info!(evicted, "evicted expired tasks");
            self.save(&tasks)?;
        }
        Ok(tasks)
    }

    fn create(&mut self, fields: NewTask, now: DateTime<Local>) -> Result<Task> {
        let task = Task::new(fields, now)?;
        let mut tasks = self.load()?;
        tasks.push(task.clone());
        self.save(&tasks)?;
        debug!(task_id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        let mut tasks = self.load()?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task_id = %id, "update for unknown task ignored");
            return Ok(None);
        };
        task.apply(patch)?;
        let updated = task.clone();
        self.save(&tasks)?;
        Ok(Some(updated))
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save(&tasks)?;
        Ok(true)
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTaskStore {
    pub tasks: Vec<Task>,
    pub retention: Option<Duration>,
}

#[cfg(test)]
impl TaskStore for MemoryTaskStore {
    fn list(&mut self, now: DateTime<Local>) -> Result<Vec<Task>> {
        let retention = self.retention.unwrap_or_else(|| Duration::days(14));
        evict_expired(&mut self.tasks, now, retention);
        Ok(self.tasks.clone())
    }

    fn create(&mut self, fields: NewTask, now: DateTime<Local>) -> Result<Task> {
        let task = Task::new(fields, now)?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.apply(patch)?;
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        Ok(self.tasks.len() != before)
    }
}

/// Memory store whose reads or writes can be switched to fail, for tests
#[cfg(test)]
#[derive(Default)]
pub struct FlakyTaskStore {
    pub inner: MemoryTaskStore,
    pub fail_reads: std::rc::Rc<std::cell::Cell<bool>>,
    pub fail_writes: std::rc::Rc<std::cell::Cell<bool>>,
}

#[cfg(test)]
impl FlakyTaskStore {
    fn check_write(&self) -> Result<()> {
        if self.fail_writes.get() {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}

#[cfg(test)]
impl TaskStore for FlakyTaskStore {
    fn list(&mut self, now: DateTime<Local>) -> Result<Vec<Task>> {
        if self.fail_reads.get() {
            anyhow::bail!("task file unreadable");
        }
        self.inner.list(now)
    }

    fn create(&mut self, fields: NewTask, now: DateTime<Local>) -> Result<Task> {
        self.check_write()?;
        self.inner.create(fields, now)
    }

    fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        self.check_write()?;
        self.inner.update(id, patch)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        self.check_write()?;
        self.inner.delete(id)
    }
}
