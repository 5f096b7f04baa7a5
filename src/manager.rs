use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::models::{Task, MAX_DESC, MAX_TITLE};
use crate::store::Store;

/// Everything a task mutation can report back to the caller.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Title is required.")]
    TitleRequired,
    #[error("Title must be <= {MAX_TITLE} characters.")]
    TitleTooLong,
    #[error("Description must be <= {MAX_DESC} characters.")]
    DescriptionTooLong,
    #[error("Task {0} not found.")]
    NotFound(u64),
    #[error("Failed to save tasks: {0}")]
    Storage(#[from] std::io::Error),
}

impl TaskError {
    /// True for input problems the user can fix by editing the draft.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TaskError::TitleRequired | TaskError::TitleTooLong | TaskError::DescriptionTooLong
        )
    }
}

/// Owns the in-memory task list and keeps it synchronized with the store.
///
/// Every mutating operation writes the full collection back as its final
/// step, so the file always matches memory once the call returns.
pub struct TaskManager {
    tasks: Vec<Task>,
    store: Store,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl TaskManager {
    /// Creates a manager over the given store, loading whatever it holds.
    pub fn new(store: Store) -> TaskManager {
        let tasks = store.load();
        TaskManager { tasks, store }
    }

    /// Checks a draft against the field constraints.
    ///
    /// At most one error is reported, in this order: missing title, title
    /// too long, description too long. Lengths are counted after trimming.
    pub fn validate(title: &str, description: &str) -> Option<TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Some(TaskError::TitleRequired);
        }
        if title.chars().count() > MAX_TITLE {
            return Some(TaskError::TitleTooLong);
        }
        if description.trim().chars().count() > MAX_DESC {
            return Some(TaskError::DescriptionTooLong);
        }
        None
    }

    /// Creates a new task from the given draft and persists it.
    pub fn add(&mut self, title: &str, description: &str) -> Result<Task, TaskError> {
        if let Some(e) = Self::validate(title, description) {
            return Err(e);
        }
        let now = now_ms();
        let task = Task {
            id: self.next_id(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            done: false,
            created_at: now,
            updated_at: now,
        };
        debug!(id = task.id, "adding task");
        self.tasks.insert(0, task.clone());
        self.store.save(&self.tasks)?;
        Ok(task)
    }

    /// Replaces the title and description of an existing task.
    ///
    /// `created_at` and `done` are left untouched.
    pub fn update(&mut self, id: u64, title: &str, description: &str) -> Result<Task, TaskError> {
        if let Some(e) = Self::validate(title, description) {
            return Err(e);
        }
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.title = title.trim().to_string();
        task.description = description.trim().to_string();
        task.updated_at = now_ms();
        let task = task.clone();
        debug!(id, "updated task");
        self.store.save(&self.tasks)?;
        Ok(task)
    }

    /// Flips the completion flag of an existing task.
    pub fn toggle_done(&mut self, id: u64) -> Result<Task, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.done = !task.done;
        task.updated_at = now_ms();
        let task = task.clone();
        debug!(id, done = task.done, "toggled task");
        self.store.save(&self.tasks)?;
        Ok(task)
    }

    /// Deletes a task. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: u64) -> Result<(), TaskError> {
        self.tasks.retain(|t| t.id != id);
        self.store.save(&self.tasks)?;
        Ok(())
    }

    /// Returns a read-only view of the tasks, newest first.
    ///
    /// Ties on `created_at` keep their stored relative order.
    pub fn list_ordered(&self) -> Vec<Task> {
        let mut ordered = self.tasks.clone();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ordered
    }

    /// Looks up a single task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The store this manager writes through to.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // Ids start at 1 so zero never names a task. Saturating: a hand-edited
    // file holding u64::MAX must not panic the next add.
    fn next_id(&self) -> u64 {
        self.tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}
