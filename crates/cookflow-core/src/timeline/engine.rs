//! Timeline engine implementation.
//!
//! The engine is a pure scheduler over an immutable step list. It owns no
//! thread and no OS timer: the driver calls `tick()` once per second (see
//! [`TickClock`](super::TickClock)) and tests call it directly.
//!
//! ## Event order
//!
//! ```text
//! start()          -> step_start
//! tick()           -> timer_tick [, timer_done [, <complete_step() when auto_advance>]]
//! complete_step()  -> [inventory_deduct,] step_complete, (step_start | recipe_complete)
//! next/prev/go_to  -> step_start
//! ```
//!
//! Every operation returns the events it produced, and also hands each one
//! to the registered listeners in registration order. A listener may ask the
//! engine to act through [`Requests`]; those requests run right after the
//! operation that emitted the event, so a `timer_done` listener calling
//! `complete_step()` behaves like auto-advance.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::event::{TimelineEvent, TimelineEventKind};
use super::step::{deductions_for, total_duration_secs, Deduction, Step};

/// Handle returned by [`TimelineEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TimelineEvent, &mut Requests) + Send>;

/// Upper bound on listener-request rounds drained after one operation.
const MAX_REQUEST_ROUNDS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    CompleteStep { at: usize },
    NextStep { at: usize },
    PrevStep { at: usize },
    GoToStep(usize),
    Pause,
    Resume,
}

/// Operations a listener asks the engine to perform once dispatch returns.
///
/// Step-relative requests are tied to the step that was current when the
/// event fired and are dropped if the engine has moved on since, so a
/// listener completing an auto-advancing step cannot complete the next one.
#[derive(Debug, Default)]
pub struct Requests {
    at: usize,
    queue: Vec<Request>,
}

impl Requests {
    pub fn complete_step(&mut self) {
        self.queue.push(Request::CompleteStep { at: self.at });
    }

    pub fn next_step(&mut self) {
        self.queue.push(Request::NextStep { at: self.at });
    }

    pub fn prev_step(&mut self) {
        self.queue.push(Request::PrevStep { at: self.at });
    }

    pub fn go_to_step(&mut self, index: usize) {
        self.queue.push(Request::GoToStep(index));
    }

    pub fn pause(&mut self) {
        self.queue.push(Request::Pause);
    }

    pub fn resume(&mut self) {
        self.queue.push(Request::Resume);
    }
}

/// Read-only view of the engine for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    pub step_index: usize,
    pub step_count: usize,
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub total_elapsed_secs: u64,
    pub running: bool,
    pub paused: bool,
    pub finished: bool,
    pub progress_pct: f64,
}

/// Step cursor plus a one-tick-per-second clock.
pub struct TimelineEngine {
    steps: Vec<Step>,
    deductions: BTreeMap<usize, Deduction>,
    current_index: usize,
    elapsed_secs: u64,
    total_elapsed_secs: u64,
    running: bool,
    paused: bool,
    /// `recipe_complete` fired; the engine accepts no further ticks.
    finished: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    requests: Requests,
}

impl fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineEngine")
            .field("steps", &self.steps.len())
            .field("current_index", &self.current_index)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("total_elapsed_secs", &self.total_elapsed_secs)
            .field("running", &self.running)
            .field("paused", &self.paused)
            .field("finished", &self.finished)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TimelineEngine {
    /// Create an engine over a fixed step list. Deductions are derived here,
    /// once; the list never changes afterwards.
    pub fn new(steps: Vec<Step>) -> Self {
        for (i, step) in steps.iter().enumerate() {
            if step.has_partial_ingredient() {
                warn!(step = i, id = %step.id, "step has a partial ingredient and will not deduct");
            }
        }
        let deductions = deductions_for(&steps);
        Self {
            steps,
            deductions,
            current_index: 0,
            elapsed_secs: 0,
            total_elapsed_secs: 0,
            running: false,
            paused: false,
            finished: false,
            listeners: Vec::new(),
            next_listener_id: 0,
            requests: Requests::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn deductions(&self) -> &BTreeMap<usize, Deduction> {
        &self.deductions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn total_elapsed_secs(&self) -> u64 {
        self.total_elapsed_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.current_step()
            .map(|s| s.duration_secs.saturating_sub(self.elapsed_secs))
            .unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 0.0 .. 100.0 progress across all timed steps.
    pub fn progress_pct(&self) -> f64 {
        let total = total_duration_secs(&self.steps);
        if total == 0 {
            return 0.0;
        }
        let done = total_duration_secs(&self.steps[..self.current_index.min(self.steps.len())]);
        let current = self
            .current_step()
            .map(|s| self.elapsed_secs.min(s.duration_secs))
            .unwrap_or(0);
        ((done + current) as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            step_index: self.current_index,
            step_count: self.steps.len(),
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            total_elapsed_secs: self.total_elapsed_secs,
            running: self.running,
            paused: self.paused,
            finished: self.finished,
            progress_pct: self.progress_pct(),
        }
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TimelineEvent, &mut Requests) + Send + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the clock at the current step. No-op while running, after
    /// `recipe_complete`, or with no steps at all.
    pub fn start(&mut self) -> Vec<TimelineEvent> {
        if self.running || self.finished || self.steps.is_empty() {
            return Vec::new();
        }
        self.running = true;
        self.paused = false;
        self.elapsed_secs = 0;
        info!(steps = self.steps.len(), "timeline started");
        let mut out = Vec::new();
        self.emit(TimelineEventKind::StepStart, None, &mut out);
        self.drain_requests(&mut out);
        out
    }

    /// Advance the clock by one second. Suppressed while paused or stopped.
    pub fn tick(&mut self) -> Vec<TimelineEvent> {
        if !self.running || self.paused {
            return Vec::new();
        }
        let Some((duration, auto_advance)) =
            self.current_step().map(|s| (s.duration_secs, s.auto_advance))
        else {
            return Vec::new();
        };

        self.elapsed_secs += 1;
        self.total_elapsed_secs += 1;
        trace!(step = self.current_index, elapsed = self.elapsed_secs, "tick");

        let mut out = Vec::new();
        self.emit(TimelineEventKind::TimerTick, None, &mut out);
        if duration > 0 && self.elapsed_secs >= duration {
            self.emit(TimelineEventKind::TimerDone, None, &mut out);
            if auto_advance {
                self.complete_inner(&mut out);
            }
        }
        self.drain_requests(&mut out);
        out
    }

    /// Finish the current step: announce its deduction, then move on or
    /// finish the recipe.
    pub fn complete_step(&mut self) -> Vec<TimelineEvent> {
        let mut out = Vec::new();
        self.complete_inner(&mut out);
        self.drain_requests(&mut out);
        out
    }

    /// Move forward without completing; never deducts. No-op on the last step.
    pub fn next_step(&mut self) -> Vec<TimelineEvent> {
        let mut out = Vec::new();
        self.next_inner(&mut out);
        self.drain_requests(&mut out);
        out
    }

    /// No-op at index 0.
    pub fn prev_step(&mut self) -> Vec<TimelineEvent> {
        let mut out = Vec::new();
        self.prev_inner(&mut out);
        self.drain_requests(&mut out);
        out
    }

    /// Jump to `index`; never deducts. No-op when out of range.
    pub fn go_to_step(&mut self, index: usize) -> Vec<TimelineEvent> {
        let mut out = Vec::new();
        self.go_to_inner(index, &mut out);
        self.drain_requests(&mut out);
        out
    }

    /// Returns true if the engine was running and is now paused.
    pub fn pause(&mut self) -> bool {
        if !self.running || self.paused {
            return false;
        }
        self.paused = true;
        debug!(step = self.current_index, "timeline paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        debug!(step = self.current_index, "timeline resumed");
        true
    }

    /// Stop the clock without finishing the recipe. Listeners stay attached.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Stop the clock and drop every listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.stop();
        self.listeners.clear();
        self.requests.queue.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_inner(&mut self, out: &mut Vec<TimelineEvent>) {
        if self.finished || self.current_step().is_none() {
            return;
        }
        if let Some(deduction) = self.deductions.get(&self.current_index).cloned() {
            self.emit(TimelineEventKind::InventoryDeduct, Some(deduction), out);
        }
        self.emit(TimelineEventKind::StepComplete, None, out);

        if self.current_index + 1 >= self.steps.len() {
            self.running = false;
            self.paused = false;
            self.finished = true;
            info!(total_elapsed = self.total_elapsed_secs, "recipe complete");
            self.emit(TimelineEventKind::RecipeComplete, None, out);
        } else {
            self.enter_step(self.current_index + 1, out);
        }
    }

    fn next_inner(&mut self, out: &mut Vec<TimelineEvent>) {
        if !self.finished && self.current_index + 1 < self.steps.len() {
            self.enter_step(self.current_index + 1, out);
        }
    }

    fn prev_inner(&mut self, out: &mut Vec<TimelineEvent>) {
        if !self.finished && self.current_index > 0 {
            self.enter_step(self.current_index - 1, out);
        }
    }

    fn go_to_inner(&mut self, index: usize, out: &mut Vec<TimelineEvent>) {
        if !self.finished && index < self.steps.len() {
            self.enter_step(index, out);
        }
    }

    fn enter_step(&mut self, index: usize, out: &mut Vec<TimelineEvent>) {
        debug!(from = self.current_index, to = index, "step entered");
        self.current_index = index;
        self.elapsed_secs = 0;
        self.emit(TimelineEventKind::StepStart, None, out);
    }

    fn emit(
        &mut self,
        kind: TimelineEventKind,
        deduction: Option<Deduction>,
        out: &mut Vec<TimelineEvent>,
    ) {
        let Some(step) = self.steps.get(self.current_index).cloned() else {
            return;
        };
        let event = TimelineEvent {
            kind,
            step_index: self.current_index,
            remaining_secs: step.duration_secs.saturating_sub(self.elapsed_secs),
            step: Some(step),
            elapsed_secs: self.elapsed_secs,
            deduction,
            at: Utc::now(),
        };
        self.requests.at = self.current_index;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &mut self.requests);
        }
        out.push(event);
    }

    fn drain_requests(&mut self, out: &mut Vec<TimelineEvent>) {
        for _ in 0..MAX_REQUEST_ROUNDS {
            if self.requests.queue.is_empty() {
                return;
            }
            let batch = std::mem::take(&mut self.requests.queue);
            for request in batch {
                self.apply(request, out);
            }
        }
        warn!(
            dropped = self.requests.queue.len(),
            "listener requests did not settle; dropping the rest"
        );
        self.requests.queue.clear();
    }

    fn apply(&mut self, request: Request, out: &mut Vec<TimelineEvent>) {
        match request {
            Request::CompleteStep { at } if at == self.current_index => self.complete_inner(out),
            Request::NextStep { at } if at == self.current_index => self.next_inner(out),
            Request::PrevStep { at } if at == self.current_index => self.prev_inner(out),
            Request::GoToStep(index) => self.go_to_inner(index, out),
            Request::Pause => {
                self.pause();
            }
            Request::Resume => {
                self.resume();
            }
            stale => trace!(?stale, current = self.current_index, "stale listener request dropped"),
        }
    }
}
