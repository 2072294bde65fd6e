use super::task::{Subtask, SubtaskId, Task, TaskDraft, TaskId, TaskUpdate};
use crate::clock::IdGenerator;
use crate::error::{TaskError, TaskResult};
use crate::storage::{Persistence, Record};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

/// Label shown when a referenced task no longer exists
pub const UNTITLED_TASK: &str = "Untitled task";

/// Ordered, in-memory collection of tasks
///
/// The store exclusively owns its tasks and their subtasks. Every successful
/// mutation is followed by a full write of the collection through the
/// injected [`Persistence`] port.
pub struct TaskStore {
    /// Insertion order is meaningful: views break ties by it
    tasks: Vec<Task>,
    ids: IdGenerator,
    persistence: Arc<dyn Persistence>,
}

impl TaskStore {
    /// Create a store over already-loaded tasks without writing anything
    pub fn new(tasks: Vec<Task>, persistence: Arc<dyn Persistence>) -> Self {
        let ids = IdGenerator::new();
        let highest = tasks
            .iter()
            .flat_map(|t| std::iter::once(t.id).chain(t.subtasks.iter().map(|s| s.id)))
            .max();
        if let Some(highest) = highest {
            ids.observe(highest);
        }
        Self {
            tasks,
            ids,
            persistence,
        }
    }

    /// Build the store from the persisted `tasks` key
    ///
    /// When the key has never been written (first start) the store is seeded
    /// with a welcome task dated `today`, and that seed is committed.
    pub fn from_snapshot(
        tasks: Option<Vec<Task>>,
        today: NaiveDate,
        persistence: Arc<dyn Persistence>,
    ) -> TaskResult<Self> {
        match tasks {
            Some(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                Ok(Self::new(tasks, persistence))
            }
            None => {
                let mut store = Self::new(Vec::new(), persistence);
                let welcome = Task {
                    id: store.next_id()?,
                    title: "Welcome to your local task manager".to_string(),
                    date: Some(today),
                    time: None,
                    tag: Some("General".to_string()),
                    completed: false,
                    is_event: false,
                    subtasks: Vec::new(),
                };
                store.apply(|tasks| {
                    tasks.push(welcome);
                    Ok(())
                })?;
                info!("seeded first-start welcome task");
                Ok(store)
            }
        }
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Title of the referenced task, or a placeholder when it is gone
    pub fn title_of(&self, id: Option<TaskId>) -> &str {
        id.and_then(|id| self.get(id))
            .map(|t| t.title.as_str())
            .unwrap_or(UNTITLED_TASK)
    }

    /// First task that is not completed, in insertion order
    pub fn first_incomplete(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.completed)
    }

    /// Run `change` on a copy of the collection and keep the copy only once
    /// it has been written
    ///
    /// A rejected change or a failed save leaves `self.tasks` as it was.
    fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut Vec<Task>) -> TaskResult<T>,
    ) -> TaskResult<T> {
        let mut next = self.tasks.clone();
        let out = change(&mut next)?;
        self.persistence.save(Record::Tasks(&next))?;
        self.tasks = next;
        Ok(out)
    }

    fn next_id(&self) -> TaskResult<i64> {
        self.ids.next_id().ok_or(TaskError::IdsExhausted)
    }

    /// Add a new pending task and return its id
    pub fn create(&mut self, draft: TaskDraft) -> TaskResult<TaskId> {
        if draft.title.trim().is_empty() {
            return Err(TaskError::empty("title"));
        }
        let Some(date) = draft.date else {
            return Err(TaskError::empty("date"));
        };

        let id = self.next_id()?;
        self.apply(|tasks| {
            tasks.push(Task {
                id,
                title: draft.title,
                date: Some(date),
                time: draft.time,
                tag: draft.tag,
                completed: false,
                is_event: draft.is_event,
                subtasks: Vec::new(),
            });
            Ok(())
        })?;
        info!(id, "created task");
        Ok(id)
    }

    /// Replace the fields named in `update`, leaving the rest untouched
    pub fn update(&mut self, id: TaskId, update: TaskUpdate) -> TaskResult<&Task> {
        if let Some(title) = &update.title
            && title.trim().is_empty()
        {
            return Err(TaskError::empty("title"));
        }
        if let Some(subtasks) = &update.subtasks
            && subtasks.iter().any(|s| s.title.trim().is_empty())
        {
            return Err(TaskError::empty("subtask title"));
        }

        self.apply(|tasks| {
            update.apply_to(find_mut(tasks, id)?);
            Ok(())
        })?;
        debug!(id, "updated task");
        self.get(id).ok_or(TaskError::TaskNotFound(id))
    }

    /// Remove a task together with all of its subtasks
    pub fn delete(&mut self, id: TaskId) -> TaskResult<Task> {
        let removed = self.apply(|tasks| {
            let pos = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(TaskError::TaskNotFound(id))?;
            Ok(tasks.remove(pos))
        })?;
        info!(id, subtasks = removed.subtasks.len(), "deleted task");
        Ok(removed)
    }

    /// Flip the completed flag and return the new value
    pub fn toggle_completed(&mut self, id: TaskId) -> TaskResult<bool> {
        let completed = self.apply(|tasks| {
            let task = find_mut(tasks, id)?;
            task.completed = !task.completed;
            Ok(task.completed)
        })?;
        debug!(id, completed, "toggled task");
        Ok(completed)
    }

    /// Append a subtask to `id` and return the subtask's id
    ///
    /// The new id is above both the generator's next id and every subtask
    /// already on the task.
    pub fn add_subtask(&mut self, id: TaskId, title: &str) -> TaskResult<SubtaskId> {
        if title.trim().is_empty() {
            return Err(TaskError::empty("subtask title"));
        }
        if self.get(id).is_none() {
            return Err(TaskError::TaskNotFound(id));
        }
        let candidate = self.next_id()?;

        let subtask_id = self.apply(|tasks| {
            let task = find_mut(tasks, id)?;
            let subtask_id = match task.subtasks.iter().map(|s| s.id).max() {
                Some(highest) if highest >= candidate => {
                    highest.checked_add(1).ok_or(TaskError::IdsExhausted)?
                }
                _ => candidate,
            };
            task.subtasks.push(Subtask {
                id: subtask_id,
                title: title.to_string(),
                completed: false,
            });
            Ok(subtask_id)
        })?;
        debug!(id, subtask_id, "added subtask");
        Ok(subtask_id)
    }

    /// Flip a subtask's completed flag and return the new value
    pub fn toggle_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> TaskResult<bool> {
        self.apply(|tasks| {
            let subtask = find_mut(tasks, task_id)?
                .find_subtask_mut(subtask_id)
                .ok_or(TaskError::SubtaskNotFound {
                    task_id,
                    subtask_id,
                })?;
            subtask.completed = !subtask.completed;
            Ok(subtask.completed)
        })
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> TaskResult<Subtask> {
        self.apply(|tasks| {
            let task = find_mut(tasks, task_id)?;
            let pos = task
                .subtasks
                .iter()
                .position(|s| s.id == subtask_id)
                .ok_or(TaskError::SubtaskNotFound {
                    task_id,
                    subtask_id,
                })?;
            Ok(task.subtasks.remove(pos))
        })
    }
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> TaskResult<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(TaskError::TaskNotFound(id))
}
