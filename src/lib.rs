//! Focus Tasks MCP Server Library
//!
//! A personal task manager with deadline urgency, a calendar view and a
//! work/rest focus timer, exposed over the Model Context Protocol.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `TaskServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `tasks`, `urgency`, `calendar`, `focus`, `settings`
//! - **Persistence Layer**: `storage` module - TOML file behind a `Persistence` port
//!
//! # Example
//!
//! ```no_run
//! use focus_tasks::TaskServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = TaskServerHandler::new("tasks.toml")?;
//!     handler.resume_focus_ticker();
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod clock;
pub mod error;
pub mod focus;
pub mod formatting;
pub mod handlers;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod ticker;
pub mod urgency;
pub mod validation;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{StorageError, TaskError, TaskResult};
pub use focus::{FocusMode, FocusState, FocusTimer};
pub use settings::Settings;
pub use storage::{MemoryStorage, Persistence, Storage};
pub use tasks::{Subtask, TagFilter, Task, TaskStore};
pub use urgency::{TaskStatus, UrgencyBand};

use ticker::{TICK_PERIOD, Ticker};

/// MCP Server handler for the task manager
///
/// Owns the task store, the focus timer and the user settings. Every change
/// is committed to storage immediately. While a focus session is running a
/// background tick decrements the countdown once per second.
pub struct TaskServerHandler {
    pub(crate) store: Mutex<TaskStore>,
    pub(crate) focus: Arc<Mutex<FocusTimer>>,
    pub(crate) settings: Mutex<Settings>,
    pub(crate) ticker: Mutex<Ticker>,
    /// Cleared by the tick loop, under the focus lock, when it decides to end
    pub(crate) tick_alive: Arc<AtomicBool>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl TaskServerHandler {
    /// Create a handler backed by a TOML file
    ///
    /// # Arguments
    /// * `storage_path` - Path to the data file; created on first save
    ///
    /// # Example
    /// ```no_run
    /// # use focus_tasks::TaskServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = TaskServerHandler::new("tasks.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: impl AsRef<Path>) -> Result<Self> {
        let storage = Arc::new(Storage::new(storage_path));
        Self::with_parts(storage, Arc::new(SystemClock))
    }

    /// Create a handler from an explicit persistence backend and clock
    pub fn with_parts(persistence: Arc<dyn Persistence>, clock: Arc<dyn Clock>) -> Result<Self> {
        let snapshot = persistence.load()?;

        let store = TaskStore::from_snapshot(snapshot.tasks, clock.today(), persistence.clone())?;
        let focus = FocusTimer::new(snapshot.focus, persistence.clone());
        let settings = Settings::new(snapshot.dark_mode, snapshot.work_minutes, persistence);

        info!(
            tasks = store.len(),
            session_active = focus.state().is_session_active,
            "state loaded"
        );

        Ok(Self {
            store: Mutex::new(store),
            focus: Arc::new(Mutex::new(focus)),
            settings: Mutex::new(settings),
            ticker: Mutex::new(Ticker::new()),
            tick_alive: Arc::new(AtomicBool::new(false)),
            clock,
        })
    }

    /// Restart ticking for a session that was running when the process last exited
    ///
    /// Must be called from within a tokio runtime.
    pub fn resume_focus_ticker(&self) {
        if self.focus.lock().unwrap().state().is_ticking() {
            info!("resuming running focus session");
        }
        self.sync_ticker();
    }

    /// Whether the background tick is currently scheduled
    pub fn is_ticking(&self) -> bool {
        self.ticker.lock().unwrap().is_running() && self.tick_alive.load(Ordering::SeqCst)
    }

    /// Current focus state
    pub fn focus_state(&self) -> FocusState {
        self.focus.lock().unwrap().state().clone()
    }

    /// Start or stop the tick source to match the focus state
    ///
    /// The focus lock is held throughout, so a tick loop that is about to end
    /// has either already cleared `tick_alive` (and gets replaced) or will
    /// see the new state and keep going.
    pub(crate) fn sync_ticker(&self) {
        let timer = self.focus.lock().unwrap();
        let mut ticker = self.ticker.lock().unwrap();

        if !timer.state().is_ticking() {
            ticker.stop();
            self.tick_alive.store(false, Ordering::SeqCst);
            return;
        }
        if ticker.is_running() && self.tick_alive.load(Ordering::SeqCst) {
            return;
        }

        self.tick_alive.store(true, Ordering::SeqCst);
        let focus = Arc::clone(&self.focus);
        let alive = Arc::clone(&self.tick_alive);
        ticker.start(TICK_PERIOD, move || {
            let mut timer = focus.lock().unwrap();
            let still_ticking = match timer.tick() {
                Ok(still_ticking) => still_ticking,
                Err(e) => {
                    warn!("failed to save focus state: {}", e);
                    timer.state().is_ticking()
                }
            };
            if !still_ticking {
                alive.store(false, Ordering::SeqCst);
            }
            still_ticking
        });
    }
}

/// MCP server for a personal task manager with a focus timer
///
/// Tasks have a title, an optional due date and time, an optional tag and a
/// checklist of subtasks. Each task is classified into an urgency band:
/// event-done, completed, overdue, today, critical (1-3 days), warning (4-9),
/// safe (10-21) or distant (22+).
///
/// Ids are integers returned by the tools that create things.
/// Dates use YYYY-MM-DD, times HH:MM, months YYYY-MM.
#[mcp_server]
impl McpServer for TaskServerHandler {
    /// **Add task**: Create a pending task with a due date.
    /// **Event**: Events stay visible on their day after completion.
    #[tool]
    async fn add_task(
        &self,
        /// Title: brief description (required)
        title: String,
        /// Due date: YYYY-MM-DD (required)
        date: String,
        /// Due time: HH:MM, omit for an all-day task (optional)
        time: Option<String>,
        /// Tag: free-form category, e.g. "Work" (optional)
        tag: Option<String>,
        /// Event: true for appointments that should stay on the calendar (optional)
        is_event: Option<bool>,
    ) -> McpResult<String> {
        self.handle_add_task(title, date, time, tag, is_event).await
    }

    /// **Update task**: Change fields of a task. Only provided fields change.
    /// **Tip**: Use empty string "" to clear date, time or tag.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_task(
        &self,
        /// ID of the task
        id: i64,
        /// New title (optional)
        title: Option<String>,
        /// New due date YYYY-MM-DD, "" clears (optional)
        date: Option<String>,
        /// New due time HH:MM, "" clears (optional)
        time: Option<String>,
        /// New tag, "" clears (optional)
        tag: Option<String>,
        /// Event flag (optional)
        is_event: Option<bool>,
        /// Completed flag (optional)
        completed: Option<bool>,
    ) -> McpResult<String> {
        self.handle_update_task(id, title, date, time, tag, is_event, completed)
            .await
    }

    /// **Delete task**: Remove a task and all of its subtasks permanently.
    #[tool]
    async fn delete_task(
        &self,
        /// ID of the task
        id: i64,
    ) -> McpResult<String> {
        self.handle_delete_task(id).await
    }

    /// **Toggle task**: Flip a task between pending and completed.
    #[tool]
    async fn toggle_task(
        &self,
        /// ID of the task
        id: i64,
    ) -> McpResult<String> {
        self.handle_toggle_task(id).await
    }

    /// **Add subtask**: Append a checklist step to a task.
    #[tool]
    async fn add_subtask(
        &self,
        /// ID of the parent task
        task_id: i64,
        /// Subtask title
        title: String,
    ) -> McpResult<String> {
        self.handle_add_subtask(task_id, title).await
    }

    /// **Toggle subtask**: Flip a checklist step between pending and completed.
    #[tool]
    async fn toggle_subtask(
        &self,
        /// ID of the parent task
        task_id: i64,
        /// ID of the subtask
        subtask_id: i64,
    ) -> McpResult<String> {
        self.handle_toggle_subtask(task_id, subtask_id).await
    }

    /// **Delete subtask**: Remove a checklist step from a task.
    #[tool]
    async fn delete_subtask(
        &self,
        /// ID of the parent task
        task_id: i64,
        /// ID of the subtask
        subtask_id: i64,
    ) -> McpResult<String> {
        self.handle_delete_subtask(task_id, subtask_id).await
    }

    /// **List**: Pending tasks sorted by deadline (undated last), with urgency.
    /// **Use**: completed=true lists finished tasks instead.
    #[tool]
    async fn list(
        &self,
        /// Tag filter: tag name, or "all"/empty for every task (optional)
        tag: Option<String>,
        /// Show completed tasks instead of pending ones (optional)
        completed: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list(tag, completed).await
    }

    /// **Tags**: All tags in use, in order of first appearance.
    #[tool]
    async fn tags(&self) -> McpResult<String> {
        self.handle_tags().await
    }

    /// **Day**: Tasks due on one day. Completed events stay listed.
    #[tool]
    async fn day(
        &self,
        /// Date: YYYY-MM-DD, defaults to today (optional)
        date: Option<String>,
        /// Tag filter (optional)
        tag: Option<String>,
    ) -> McpResult<String> {
        self.handle_day(date, tag).await
    }

    /// **Calendar**: Month grid (weeks start Monday) with per-day urgency.
    /// **Markers**: "!" critical or overdue, "*" other days with tasks, "<" today.
    #[tool]
    async fn calendar(
        &self,
        /// Month: YYYY-MM, defaults to the current month (optional)
        month: Option<String>,
        /// Months to move from that month, e.g. -1 previous, 1 next (optional)
        offset: Option<i32>,
        /// Tag filter (optional)
        tag: Option<String>,
    ) -> McpResult<String> {
        self.handle_calendar(month, offset, tag).await
    }

    /// **Focus status**: Show the focus timer: setup preview or running countdowns.
    #[tool]
    async fn focus_status(&self) -> McpResult<String> {
        self.handle_focus_status().await
    }

    /// **Focus select**: Choose the task for the next session (setup only).
    #[tool]
    async fn focus_select(
        &self,
        /// ID of the task, omit to clear the choice (optional)
        task_id: Option<i64>,
    ) -> McpResult<String> {
        self.handle_focus_select(task_id).await
    }

    /// **Focus start**: Start a work session. Rest length is a quarter of the work length.
    /// **Task**: Defaults to the selected task, else the first pending task.
    #[tool]
    async fn focus_start(
        &self,
        /// Task to focus on (optional)
        task_id: Option<i64>,
        /// Work length in minutes; saved as the new default (optional)
        work_minutes: Option<u32>,
    ) -> McpResult<String> {
        self.handle_focus_start(task_id, work_minutes).await
    }

    /// **Focus toggle**: Pause or resume the running countdown.
    #[tool]
    async fn focus_toggle(&self) -> McpResult<String> {
        self.handle_focus_toggle().await
    }

    /// **Focus switch**: Swap between work and rest; always resumes.
    #[tool]
    async fn focus_switch(&self) -> McpResult<String> {
        self.handle_focus_switch().await
    }

    /// **Focus stop**: End the session and return to setup. Requires confirm=true.
    #[tool]
    async fn focus_stop(
        &self,
        /// Must be true to actually stop
        confirm: Option<bool>,
    ) -> McpResult<String> {
        self.handle_focus_stop(confirm).await
    }

    /// **Settings**: Show settings; optionally toggle dark mode or set the work length.
    #[tool]
    async fn settings(
        &self,
        /// Flip dark mode (optional)
        toggle_dark_mode: Option<bool>,
        /// Default work length in minutes, minimum 1 (optional)
        work_minutes: Option<u32>,
    ) -> McpResult<String> {
        self.handle_settings(toggle_dark_mode, work_minutes).await
    }
}
