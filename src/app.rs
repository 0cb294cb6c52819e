use crate::domain::{ClockTime, NewTask, Priority, Task, TaskPatch, TaskStatus, UiMode};
use crate::notifications::NotificationSink;
use crate::persistence::TaskStore;
use crate::reminder::{Phase, ReminderEngine, ReminderEvent};
use crate::report::{calculate_task_stats, TaskStats};
use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{info, warn};
use uuid::Uuid;

/// Form field order
pub const FIELD_TITLE: usize = 0;
pub const FIELD_START: usize = 1;
pub const FIELD_END: usize = 2;
pub const FIELD_PRIORITY: usize = 3;
pub const FIELD_STATUS: usize = 4;
const FIELD_COUNT: usize = 5;

/// Add/edit form state
#[derive(Debug, Clone)]
pub struct TaskFormState {
    /// Task being edited; `None` when adding
    pub task_id: Option<Uuid>,
    pub title: String,
    pub start: String,
    pub end: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub editing_field: usize,
    pub error: Option<String>,
}

impl TaskFormState {
    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.editing_field {
            FIELD_TITLE => Some(&mut self.title),
            FIELD_START => Some(&mut self.start),
            FIELD_END => Some(&mut self.end),
            _ => None,
        }
    }

    /// Validate the form into the fields of a task
    fn to_new_task(&self) -> Result<NewTask, String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        let start_time: ClockTime = self.start.parse().map_err(|e| format!("Start: {}", e))?;
        let end_time: ClockTime = self.end.parse().map_err(|e| format!("End: {}", e))?;
        Ok(NewTask {
            title: self.title.trim().to_string(),
            start_time,
            end_time,
            priority: self.priority,
            status: self.status,
        })
    }
}

/// Pre-expiry warning shown over the main view
#[derive(Debug, Clone)]
pub struct WarningPrompt {
    pub task_id: Uuid,
    pub title: String,
    pub remaining: u32,
}

/// Completion question raised when a task window closes
#[derive(Debug, Clone)]
pub struct CompletionPrompt {
    pub task_id: Uuid,
    pub title: String,
}

/// Main application state
pub struct AppState {
    store: Box<dyn TaskStore>,
    sink: Box<dyn NotificationSink>,
    engine: ReminderEngine,
    pub snooze_options: Vec<u32>,
    pub tasks: Vec<Task>,
    pub current: Option<Task>,
    pub remaining: Option<u32>,
    pub stats: TaskStats,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub form: Option<TaskFormState>,
    pub warning: Option<WarningPrompt>,
    pub completion: Option<CompletionPrompt>,
    pub pending_delete: Option<Uuid>,
    pub show_all_tasks: bool,
    pub show_stats: bool,
    pub last_error: Option<String>,
    reload_failed: bool,
    pub now: DateTime<Local>,
}

impl AppState {
    pub fn new(
        store: Box<dyn TaskStore>,
        sink: Box<dyn NotificationSink>,
        snooze_options: Vec<u32>,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let mut app = Self {
            store,
            sink,
            engine: ReminderEngine::new(),
            snooze_options,
            tasks: Vec::new(),
            current: None,
            remaining: None,
            stats: calculate_task_stats(&[]),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            form: None,
            warning: None,
            completion: None,
            pending_delete: None,
            show_all_tasks: false,
            show_stats: false,
            last_error: None,
            reload_failed: false,
            now,
        };
        app.reload(now)?;
        Ok(app)
    }

    /// Re-read the store and recompute derived state
    fn reload(&mut self, now: DateTime<Local>) -> Result<()> {
        self.tasks = self.store.list(now)?;
        self.stats = calculate_task_stats(&self.tasks);
        let visible = self.visible_tasks().len();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
        Ok(())
    }

    /// One reminder step: re-evaluate the current task and raise prompts
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.now = now;
        match self.reload(now) {
            Ok(()) => {
                if self.reload_failed {
                    self.reload_failed = false;
                    self.last_error = None;
                }
            }
            Err(err) => {
                // Keep ticking on the last good snapshot
                warn!(error = %err, "failed to reload tasks");
                self.reload_failed = true;
                self.last_error = Some(format!("Failed to load tasks: {}", err));
            }
        }

        let evaluation = self.engine.evaluate(&now, &self.tasks);
        self.current = evaluation.current;
        self.remaining = evaluation.remaining;

        match evaluation.event {
            Some(ReminderEvent::Warning { task_id, remaining }) => {
                self.sink.play_warning();
                let title = self.title_of(task_id);
                self.warning = Some(WarningPrompt {
                    task_id,
                    title,
                    remaining,
                });
            }
            Some(ReminderEvent::Expired { task_id, priority }) => {
                self.sink.play_alarm(priority);
                if self.warning.as_ref().is_some_and(|w| w.task_id == task_id) {
                    self.warning = None;
                }
                let title = self.title_of(task_id);
                self.completion = Some(CompletionPrompt { task_id, title });
            }
            None => {}
        }

        self.refresh_mode();
    }

    /// Reminder phase of the current activation
    pub fn phase(&self) -> Option<Phase> {
        self.engine.phase()
    }

    fn title_of(&self, task_id: Uuid) -> String {
        self.tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.title.clone())
            .unwrap_or_default()
    }

    /// Pick the mode from pending prompts unless the user is in a form or dialog
    fn refresh_mode(&mut self) {
        if matches!(
            self.ui_mode,
            UiMode::AddingTask | UiMode::EditingTask | UiMode::ConfirmDelete
        ) {
            return;
        }
        self.ui_mode = if self.completion.is_some() {
            UiMode::CompletionPrompt
        } else if self.warning.is_some() {
            UiMode::Warning
        } else {
            UiMode::Normal
        };
    }

    /// Close a dialog and fall back to whatever prompt is pending
    fn return_to_main(&mut self) {
        self.ui_mode = UiMode::Normal;
        self.refresh_mode();
    }

    /// Tasks shown in the list pane
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.show_all_tasks || !task.is_completed())
            .collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected_index + 1 < visible {
            self.selected_index += 1;
        }
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all_tasks = !self.show_all_tasks;
        self.selected_index = 0;
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    /// Dismiss the warning without acting; it won't fire again for this activation
    pub fn dismiss_warning(&mut self) {
        self.warning = None;
        self.return_to_main();
    }

    /// Answer the completion prompt. The prompt stays up if the write fails.
    pub fn resolve_completion(&mut self, decision: bool, now: DateTime<Local>) -> Result<()> {
        let Some(task_id) = self.completion.as_ref().map(|prompt| prompt.task_id) else {
            return Ok(());
        };
        let updated = self
            .store
            .update(task_id, TaskPatch::completion(decision, now))?;
        if updated.is_none() {
            warn!(task_id = %task_id, "completed task no longer exists");
        }
        self.completion = None;
        self.engine.resolve(task_id);
        info!(task_id = %task_id, completed = decision, "completion answered");
        self.reload(now)?;
        self.return_to_main();
        Ok(())
    }

    /// Snooze the prompted task using one of the configured options
    pub fn snooze_option(&mut self, index: usize, now: DateTime<Local>) -> Result<()> {
        match self.snooze_options.get(index).copied() {
            Some(minutes) => self.snooze(minutes, now),
            None => Ok(()),
        }
    }

    /// Snooze the prompted task: its window becomes `[now, now + minutes]`
    pub fn snooze(&mut self, minutes: u32, now: DateTime<Local>) -> Result<()> {
        let Some(task_id) = self.completion.as_ref().map(|prompt| prompt.task_id) else {
            return Ok(());
        };
        self.store.update(task_id, TaskPatch::snooze(minutes, &now))?;
        self.completion = None;
        self.engine.resolve(task_id);
        info!(task_id = %task_id, minutes, "task snoozed");
        self.reload(now)?;
        self.return_to_main();
        Ok(())
    }

    /// Mark the selected task done, or reopen it if it already is
    pub fn toggle_selected_completion(&mut self, now: DateTime<Local>) -> Result<()> {
        let Some(task) = self.selected_task() else {
            return Ok(());
        };
        let id = task.id;
        let decision = !task.is_completed();
        self.store.update(id, TaskPatch::completion(decision, now))?;
        self.reload(now)?;
        Ok(())
    }

    pub fn start_add_task(&mut self, now: DateTime<Local>) {
        let start = ClockTime::of(&now);
        let end = ClockTime::clamped(start.minutes() + 60);
        self.form = Some(TaskFormState {
            task_id: None,
            title: String::new(),
            start: start.to_string(),
            end: end.to_string(),
            priority: Priority::High,
            status: TaskStatus::InProgress,
            editing_field: FIELD_TITLE,
            error: None,
        });
        self.ui_mode = UiMode::AddingTask;
    }

    pub fn start_edit_task(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        self.form = Some(TaskFormState {
            task_id: Some(task.id),
            title: task.title.clone(),
            start: task.start_time.to_string(),
            end: task.end_time.to_string(),
            priority: task.priority,
            status: task.status,
            editing_field: FIELD_TITLE,
            error: None,
        });
        self.ui_mode = UiMode::EditingTask;
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.editing_field = (form.editing_field + 1) % FIELD_COUNT;
        }
    }

    pub fn form_prev_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.editing_field = (form.editing_field + FIELD_COUNT - 1) % FIELD_COUNT;
        }
    }

    pub fn form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.form {
            match form.editing_field {
                FIELD_PRIORITY if c == ' ' => form.priority = form.priority.next(),
                FIELD_STATUS if c == ' ' => form.status = form.status.next(),
                _ => {
                    if let Some(field) = form.text_field_mut() {
                        field.push(c);
                    }
                }
            }
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(field) = self.form.as_mut().and_then(|form| form.text_field_mut()) {
            field.pop();
        }
    }

    /// Cycle the choice field under the cursor
    pub fn form_cycle_choice(&mut self) {
        if let Some(form) = &mut self.form {
            match form.editing_field {
                FIELD_PRIORITY => form.priority = form.priority.next(),
                FIELD_STATUS => form.status = form.status.next(),
                _ => {}
            }
        }
    }

    /// Create or update from the form. Validation errors stay in the form.
    pub fn submit_form(&mut self, now: DateTime<Local>) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        let fields = match form.to_new_task() {
            Ok(fields) => fields,
            Err(message) => {
                form.error = Some(message);
                return Ok(());
            }
        };

        match form.task_id {
            Some(id) => {
                let patch = TaskPatch {
                    title: Some(fields.title),
                    start_time: Some(fields.start_time),
                    end_time: Some(fields.end_time),
                    priority: Some(fields.priority),
                    status: Some(fields.status),
                    ..TaskPatch::default()
                };
                self.store.update(id, patch)?;
            }
            None => {
                let task = self.store.create(fields, now)?;
                info!(task_id = %task.id, title = %task.title, "task added");
            }
        }

        self.form = None;
        self.reload(now)?;
        self.return_to_main();
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.return_to_main();
    }

    pub fn request_delete(&mut self) {
        if let Some(task) = self.selected_task() {
            self.pending_delete = Some(task.id);
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self, now: DateTime<Local>) -> Result<()> {
        if let Some(id) = self.pending_delete.take() {
            self.store.delete(id)?;
            if self.completion.as_ref().is_some_and(|p| p.task_id == id) {
                self.completion = None;
            }
            if self.warning.as_ref().is_some_and(|w| w.task_id == id) {
                self.warning = None;
            }
            self.reload(now)?;
        }
        self.return_to_main();
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.return_to_main();
    }

    pub fn pending_delete_title(&self) -> Option<String> {
        self.pending_delete.map(|id| self.title_of(id))
    }
}
