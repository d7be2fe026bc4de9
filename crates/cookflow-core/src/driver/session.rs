//! A cooking session: one state machine and one timeline engine kept in
//! lockstep.
//!
//! User commands go through the state machine first; only an accepted
//! transition is mirrored onto the engine. Engine-originated progress
//! (timer expiry, auto-advance, recipe completion) flows the other way as
//! `TIMER_DONE`, `STEP_COMPLETE` and `RECIPE_COMPLETE`.
//!
//! Each step charges its ingredient once per session. Advancing again over a
//! step that was already completed (after going back) uses
//! `next_step`, which never deducts.
//!
//! Navigation must go through [`CookingSession::handle`]. A timeline listener
//! that requests `next_step`/`go_to_step` moves the engine without telling
//! the machine; `complete_step` requests are fine because they surface as
//! `step_complete` events.

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use super::bindings::GestureBindings;
use crate::session::{
    EventKind, GestureReading, Phase, SessionEvent, SessionStateMachine, TransitionRecord,
};
use crate::storage::Config;
use crate::timeline::{Step, StepSource, TimelineEngine, TimelineEvent, TimelineEventKind};

/// Everything one call produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOutcome {
    pub transitions: Vec<TransitionRecord>,
    pub events: Vec<TimelineEvent>,
}

impl SessionOutcome {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.events.is_empty()
    }

    fn merge(&mut self, other: SessionOutcome) {
        self.transitions.extend(other.transitions);
        self.events.extend(other.events);
    }
}

#[derive(Debug)]
pub struct CookingSession {
    id: Uuid,
    machine: SessionStateMachine,
    engine: TimelineEngine,
    bindings: GestureBindings,
    min_gesture_confidence: f32,
    voice_enabled: bool,
    /// Highest step index completed since the last load.
    completed_through: Option<usize>,
}

impl CookingSession {
    pub fn new(config: &Config) -> Self {
        Self {
            id: Uuid::new_v4(),
            machine: SessionStateMachine::with_gesture_cooldown(config.session.gesture_cooldown_ms),
            engine: TimelineEngine::new(Vec::new()),
            bindings: GestureBindings::from_config(&config.gestures),
            min_gesture_confidence: config.session.min_gesture_confidence,
            voice_enabled: config.voice.enabled,
            completed_through: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &SessionStateMachine {
        &self.machine
    }

    pub fn engine(&self) -> &TimelineEngine {
        &self.engine
    }

    /// For subscribing listeners. Replaced by `load` and `EXIT`.
    pub fn engine_mut(&mut self) -> &mut TimelineEngine {
        &mut self.engine
    }

    pub fn bindings(&self) -> &GestureBindings {
        &self.bindings
    }

    pub fn in_lockstep(&self) -> bool {
        !matches!(self.phase(), Phase::Cooking | Phase::Paused)
            || self.machine.current_step() == self.engine.current_index()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Initialise the session with a step list. Any running session is
    /// exited first. An empty list is recorded as a load error and the
    /// session still reaches `ready`.
    pub fn load(&mut self, source: &impl StepSource) -> SessionOutcome {
        self.load_steps(source.steps().to_vec())
    }

    pub fn load_steps(&mut self, steps: Vec<Step>) -> SessionOutcome {
        let mut outcome = SessionOutcome::default();
        if self.phase() != Phase::Idle {
            outcome.merge(self.handle(SessionEvent::Exit));
        }

        let total = steps.len();
        self.engine.destroy();
        self.engine = TimelineEngine::new(steps);
        self.completed_through = None;

        let events = [
            SessionEvent::Init,
            SessionEvent::SetTotalSteps { total },
            if total == 0 {
                SessionEvent::LoadError {
                    message: "recipe has no steps".into(),
                }
            } else {
                SessionEvent::Loaded
            },
        ];
        for event in events {
            outcome.transitions.extend(self.machine.send(event));
        }
        info!(session = %self.id, steps = total, phase = ?self.phase(), "session loaded");
        outcome
    }

    /// Deliver a driver event and mirror any accepted transition onto the
    /// timeline.
    pub fn handle(&mut self, event: SessionEvent) -> SessionOutcome {
        let mut outcome = SessionOutcome::default();
        let Some(record) = self.machine.send(event) else {
            return outcome;
        };
        outcome.events = self.mirror(&record);
        outcome.transitions.push(record);
        self.check_lockstep();
        outcome
    }

    /// Gate a recognizer reading by confidence and cooldown, then run the
    /// bound command.
    pub fn handle_gesture(&mut self, reading: GestureReading) -> SessionOutcome {
        if reading.confidence < self.min_gesture_confidence {
            trace!(session = %self.id, gesture = %reading.gesture, confidence = reading.confidence, "low-confidence gesture dropped");
            return SessionOutcome::default();
        }
        let mut outcome = self.handle(SessionEvent::Gesture {
            gesture: reading.gesture,
            confidence: reading.confidence,
        });
        if outcome.transitions.is_empty() {
            return outcome;
        }
        if let Some(command) = self.bindings.command_for(reading.gesture) {
            debug!(session = %self.id, gesture = %reading.gesture, %command, "gesture bound");
            outcome.merge(self.handle(command.event()));
        }
        outcome
    }

    /// Record a recognized utterance and run the command it names, if any.
    /// Does nothing when voice input is disabled in the config.
    pub fn handle_voice(&mut self, text: &str) -> SessionOutcome {
        if !self.voice_enabled {
            trace!(session = %self.id, "voice input disabled");
            return SessionOutcome::default();
        }
        let mut outcome = self.handle(SessionEvent::VoiceCommand {
            text: text.to_string(),
        });
        if let Some(command) = super::parse_voice_command(text) {
            debug!(session = %self.id, %command, "voice command");
            outcome.merge(self.handle(command.event()));
        }
        outcome
    }

    /// Advance the timeline clock by one tick and feed its progress back to
    /// the state machine.
    pub fn tick(&mut self) -> SessionOutcome {
        let events = self.engine.tick();
        let events = self.settle(events);
        let mut transitions = Vec::new();
        for event in &events {
            let notify = match event.kind {
                TimelineEventKind::TimerDone => SessionEvent::TimerDone,
                TimelineEventKind::StepComplete => SessionEvent::StepComplete,
                TimelineEventKind::RecipeComplete => SessionEvent::RecipeComplete,
                _ => continue,
            };
            transitions.extend(self.machine.send(notify));
        }
        self.check_lockstep();
        SessionOutcome { transitions, events }
    }

    fn check_lockstep(&self) {
        if !self.in_lockstep() {
            warn!(
                session = %self.id,
                machine = self.machine.current_step(),
                timeline = self.engine.current_index(),
                "machine and timeline step cursors diverged"
            );
        }
    }

    fn is_completed(&self, index: usize) -> bool {
        self.completed_through.is_some_and(|done| index <= done)
    }

    /// Record completions and drop repeat deductions. The engine can only
    /// re-complete a step on its own through auto-advance after going back.
    fn settle(&mut self, events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
        let mut kept = Vec::with_capacity(events.len());
        for event in events {
            match event.kind {
                TimelineEventKind::InventoryDeduct if self.is_completed(event.step_index) => {
                    debug!(session = %self.id, step = event.step_index, "step already charged");
                    continue;
                }
                TimelineEventKind::StepComplete => {
                    self.completed_through = Some(
                        self.completed_through
                            .map_or(event.step_index, |done| done.max(event.step_index)),
                    );
                }
                _ => {}
            }
            kept.push(event);
        }
        kept
    }

    fn mirror(&mut self, record: &TransitionRecord) -> Vec<TimelineEvent> {
        match record.event {
            EventKind::Start => self.engine.start(),
            EventKind::Pause => {
                self.engine.pause();
                Vec::new()
            }
            EventKind::Resume => {
                self.engine.resume();
                Vec::new()
            }
            EventKind::NextStep | EventKind::StepComplete => {
                if record.from == Phase::Paused {
                    self.engine.resume();
                }
                let events = if self.is_completed(self.engine.current_index()) {
                    self.engine.next_step()
                } else {
                    self.engine.complete_step()
                };
                self.settle(events)
            }
            EventKind::PrevStep => self.engine.prev_step(),
            EventKind::RecipeComplete => {
                self.engine.stop();
                Vec::new()
            }
            EventKind::Exit => {
                self.engine.destroy();
                self.engine = TimelineEngine::new(Vec::new());
                self.completed_through = None;
                info!(session = %self.id, "session exited");
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
