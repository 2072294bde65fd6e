//! Work/rest focus timer
//!
//! [`FocusState`] is the pure state machine: `Setup` while no session is
//! active, `Active` with a work or rest countdown that is either running or
//! paused. [`FocusTimer`] wraps it and commits every change to storage.
//!
//! Reaching zero never switches modes on its own; the countdown just stops.

use crate::error::{TaskError, TaskResult};
use crate::storage::{Persistence, Record};
use crate::tasks::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    #[default]
    Work,
    Rest,
}

impl FocusMode {
    pub fn toggled(self) -> Self {
        match self {
            FocusMode::Work => FocusMode::Rest,
            FocusMode::Rest => FocusMode::Work,
        }
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusMode::Work => write!(f, "work"),
            FocusMode::Rest => write!(f, "rest"),
        }
    }
}

/// Rest length in whole minutes for a given work length
pub fn rest_minutes_for(work_minutes: u32) -> u32 {
    work_minutes / 4
}

/// Fraction of `initial` already elapsed, 0 when `initial` is 0
pub fn progress(remaining: u32, initial: u32) -> f64 {
    if initial == 0 {
        return 0.0;
    }
    (initial.saturating_sub(remaining)) as f64 / initial as f64
}

/// Snapshot of the focus timer
///
/// Invariant: `is_running` implies `is_session_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusState {
    pub work_left: u32,
    pub rest_left: u32,
    pub initial_work: u32,
    pub initial_rest: u32,
    pub mode: FocusMode,
    pub is_running: bool,
    pub is_session_active: bool,
    /// Lookup key into the task store, not ownership
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_task_id: Option<TaskId>,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            work_left: 40 * 60,
            rest_left: 10 * 60,
            initial_work: 40 * 60,
            initial_rest: 10 * 60,
            mode: FocusMode::Work,
            is_running: false,
            is_session_active: false,
            active_task_id: None,
        }
    }
}

impl FocusState {
    /// Whether the one-second tick should currently be delivered
    pub fn is_ticking(&self) -> bool {
        self.is_running && self.is_session_active
    }

    /// Remaining seconds of the current mode's countdown
    pub fn remaining(&self) -> u32 {
        match self.mode {
            FocusMode::Work => self.work_left,
            FocusMode::Rest => self.rest_left,
        }
    }

    pub fn work_progress(&self) -> f64 {
        progress(self.work_left, self.initial_work)
    }

    pub fn rest_progress(&self) -> f64 {
        progress(self.rest_left, self.initial_rest)
    }

    /// Choose the task to focus on; only allowed on the setup screen
    pub fn select_task(&mut self, task_id: Option<TaskId>) -> bool {
        if self.is_session_active {
            return false;
        }
        self.active_task_id = task_id;
        true
    }

    /// Enter the active state with fresh countdowns
    ///
    /// The focused task is `chosen`, else the one already selected, else
    /// `fallback` (the first incomplete task).
    pub fn start_session(
        &mut self,
        work_minutes: u32,
        chosen: Option<TaskId>,
        fallback: Option<TaskId>,
    ) -> TaskResult<()> {
        if work_minutes == 0 {
            return Err(TaskError::Validation(
                "work minutes must be at least 1".to_string(),
            ));
        }

        let work = work_minutes.saturating_mul(60);
        let rest = rest_minutes_for(work_minutes).saturating_mul(60);

        self.active_task_id = chosen.or(self.active_task_id).or(fallback);
        self.initial_work = work;
        self.initial_rest = rest;
        self.work_left = work;
        self.rest_left = rest;
        self.mode = FocusMode::Work;
        self.is_session_active = true;
        self.is_running = true;
        Ok(())
    }

    /// Advance the current countdown by one second
    ///
    /// A no-op unless ticking. Decrementing below zero clamps to zero and
    /// pauses without touching the mode. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_ticking() {
            return false;
        }
        let left = match self.mode {
            FocusMode::Work => &mut self.work_left,
            FocusMode::Rest => &mut self.rest_left,
        };
        match left.checked_sub(1) {
            Some(next) => *left = next,
            None => {
                *left = 0;
                self.is_running = false;
            }
        }
        true
    }

    /// Pause or resume; no effect on the setup screen
    pub fn toggle_run(&mut self) -> bool {
        if !self.is_session_active {
            return false;
        }
        self.is_running = !self.is_running;
        true
    }

    /// Swap between work and rest and always resume
    pub fn switch_mode(&mut self) -> bool {
        if !self.is_session_active {
            return false;
        }
        self.mode = self.mode.toggled();
        self.is_running = true;
        true
    }

    /// Return to the setup screen
    ///
    /// Countdowns and the selected task are kept; the next session start
    /// overwrites the countdowns.
    pub fn stop_session(&mut self) -> bool {
        if !self.is_session_active {
            return false;
        }
        self.is_session_active = false;
        self.is_running = false;
        self.mode = FocusMode::Work;
        true
    }

    /// Restore the running invariant on state loaded from storage
    fn normalized(mut self) -> Self {
        if !self.is_session_active {
            self.is_running = false;
        }
        self
    }
}

/// Focus state plus the commit step that persists it
pub struct FocusTimer {
    state: FocusState,
    persistence: Arc<dyn Persistence>,
}

impl FocusTimer {
    pub fn new(state: Option<FocusState>, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            state: state.unwrap_or_default().normalized(),
            persistence,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Apply `step` to a copy of the state and keep it once it is saved
    ///
    /// Steps that report no change skip the write. A failed write leaves the
    /// current state in place.
    fn transition(
        &mut self,
        step: impl FnOnce(&mut FocusState) -> TaskResult<bool>,
    ) -> TaskResult<bool> {
        let mut next = self.state.clone();
        if !step(&mut next)? {
            return Ok(false);
        }
        self.persistence.save(Record::Focus(&next))?;
        self.state = next;
        Ok(true)
    }

    pub fn select_task(&mut self, task_id: Option<TaskId>) -> TaskResult<bool> {
        self.transition(|state| Ok(state.select_task(task_id)))
    }

    pub fn start_session(
        &mut self,
        work_minutes: u32,
        chosen: Option<TaskId>,
        fallback: Option<TaskId>,
    ) -> TaskResult<()> {
        self.transition(|state| {
            state.start_session(work_minutes, chosen, fallback)?;
            Ok(true)
        })?;
        info!(
            work_minutes,
            task = ?self.state.active_task_id,
            "focus session started"
        );
        Ok(())
    }

    /// Deliver one tick; returns whether the timer is still ticking afterwards
    ///
    /// If the tick cannot be saved the countdown holds at its current value.
    pub fn tick(&mut self) -> TaskResult<bool> {
        if self.transition(|state| Ok(state.tick()))? && !self.state.is_running {
            info!(mode = %self.state.mode, "focus countdown reached zero");
        }
        Ok(self.state.is_ticking())
    }

    pub fn toggle_run(&mut self) -> TaskResult<bool> {
        self.transition(|state| Ok(state.toggle_run()))
    }

    pub fn switch_mode(&mut self) -> TaskResult<bool> {
        self.transition(|state| Ok(state.switch_mode()))
    }

    pub fn stop_session(&mut self) -> TaskResult<bool> {
        let changed = self.transition(|state| Ok(state.stop_session()))?;
        if changed {
            info!("focus session stopped");
        }
        Ok(changed)
    }
}
