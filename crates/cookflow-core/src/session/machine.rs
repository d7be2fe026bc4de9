//! Session state machine.
//!
//! Single source of truth for the session phase. Every event is looked up in
//! [`TRANSITIONS`](super::table::TRANSITIONS); the machine itself only
//! evaluates guards and applies actions. It does not keep time: step
//! advancement decisions are made here and executed by the timeline engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::event::{EventKind, Phase, SessionEvent};
use super::gesture::Gesture;
use super::table::{candidates, Action, Guard, Target, Transition};

/// Minimum gap between accepted gestures.
pub const DEFAULT_GESTURE_COOLDOWN_MS: u64 = 1200;

/// Mutable session context. `Default` is the state after `EXIT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub current_step: usize,
    pub total_steps: usize,
    pub last_gesture: Option<Gesture>,
    pub last_gesture_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    /// Advisory; never gates a transition.
    pub detector_ready: bool,
    /// Advisory; never gates a transition.
    pub voice_ready: bool,
}

impl SessionContext {
    pub fn has_next_step(&self) -> bool {
        self.current_step + 1 < self.total_steps
    }

    pub fn has_prev_step(&self) -> bool {
        self.current_step > 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.total_steps
    }
}

/// Result of an accepted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Phase,
    pub to: Phase,
    pub event: EventKind,
    pub step_before: usize,
    pub step_after: usize,
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn changed_phase(&self) -> bool {
        self.from != self.to
    }

    pub fn changed_step(&self) -> bool {
        self.step_before != self.step_after
    }
}

/// Phase plus context, for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    #[serde(flatten)]
    pub context: SessionContext,
}

#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: Phase,
    context: SessionContext,
    gesture_cooldown: Duration,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::with_gesture_cooldown(DEFAULT_GESTURE_COOLDOWN_MS)
    }

    pub fn with_gesture_cooldown(cooldown_ms: u64) -> Self {
        Self {
            phase: Phase::Idle,
            context: SessionContext::default(),
            gesture_cooldown: Duration::milliseconds(cooldown_ms.min(i64::MAX as u64) as i64),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn current_step(&self) -> usize {
        self.context.current_step
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            context: self.context.clone(),
        }
    }

    /// Would `kind` be accepted right now? Payload-dependent effects are not
    /// evaluated, only the table row and its guard.
    pub fn accepts(&self, kind: EventKind, now: DateTime<Utc>) -> bool {
        self.find(kind, now).is_some()
    }

    /// Event kinds that would currently be accepted, in table order.
    pub fn available_events(&self, now: DateTime<Utc>) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for t in super::table::TRANSITIONS {
            if !kinds.contains(&t.on) && self.accepts(t.on, now) {
                kinds.push(t.on);
            }
        }
        kinds
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn send(&mut self, event: SessionEvent) -> Option<TransitionRecord> {
        self.send_at(event, Utc::now())
    }

    /// Deliver an event observed at `now`. Returns `None` when the event was
    /// ignored, which covers boundary navigation, gestures inside the
    /// cooldown window and anything sent to a terminal phase.
    pub fn send_at(&mut self, event: SessionEvent, now: DateTime<Utc>) -> Option<TransitionRecord> {
        let kind = event.kind();
        let Some(transition) = self.find(kind, now) else {
            trace!(phase = ?self.phase, event = ?kind, "event ignored");
            return None;
        };

        let from = self.phase;
        let step_before = self.context.current_step;
        self.apply(transition.action, event, now);
        if let Target::Phase(next) = transition.to {
            self.phase = next;
        }

        let record = TransitionRecord {
            from,
            to: self.phase,
            event: kind,
            step_before,
            step_after: self.context.current_step,
            at: now,
        };
        debug!(
            from = ?record.from,
            to = ?record.to,
            event = ?kind,
            step = record.step_after,
            "transition"
        );
        Some(record)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn find(&self, kind: EventKind, now: DateTime<Utc>) -> Option<&'static Transition> {
        candidates(self.phase, kind).find(|t| self.guard_passes(t.guard, now))
    }

    fn guard_passes(&self, guard: Guard, now: DateTime<Utc>) -> bool {
        match guard {
            Guard::Always => true,
            Guard::HasNextStep => self.context.has_next_step(),
            Guard::HasPrevStep => self.context.has_prev_step(),
            Guard::IsLastStep => self.context.is_last_step(),
            Guard::GestureNotOnCooldown => match self.context.last_gesture_at {
                None => true,
                Some(last) => now - last > self.gesture_cooldown,
            },
        }
    }

    fn apply(&mut self, action: Action, event: SessionEvent, now: DateTime<Utc>) {
        let ctx = &mut self.context;
        match (action, event) {
            (Action::None, _) => {}
            (Action::ClearError, _) => ctx.error_message = None,
            (Action::StoreError, SessionEvent::LoadError { message }) => {
                ctx.error_message = Some(message);
            }
            (Action::IncrementStep, _) => ctx.current_step += 1,
            (Action::DecrementStep, _) => ctx.current_step = ctx.current_step.saturating_sub(1),
            (Action::ClampStep, _) => {
                ctx.current_step = ctx.current_step.min(ctx.total_steps.saturating_sub(1));
            }
            (Action::RecordGesture, SessionEvent::Gesture { gesture, .. }) => {
                ctx.last_gesture = Some(gesture);
                ctx.last_gesture_at = Some(now);
            }
            (Action::ResetContext, _) => *ctx = SessionContext::default(),
            (Action::SetDetectorReady, SessionEvent::SetDetectorReady { ready }) => {
                ctx.detector_ready = ready;
            }
            (Action::SetVoiceReady, SessionEvent::SetVoiceReady { ready }) => {
                ctx.voice_ready = ready;
            }
            (Action::SetTotalSteps, SessionEvent::SetTotalSteps { total }) => {
                ctx.total_steps = total;
            }
            (action, event) => {
                debug_assert!(false, "action {action:?} paired with {:?}", event.kind());
            }
        }
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
