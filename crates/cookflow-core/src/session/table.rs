//! The full transition surface of the session, as data.
//!
//! Rows are tried top to bottom; the first row whose source, event and guard
//! all match wins. Events matching no row are ignored.
//!
//! ```text
//! idle ──INIT──> initializing ──LOADED/LOAD_ERROR──> ready ──START──> cooking
//!   └────────────────────────START──────────────────────────────────────┘
//! cooking <──RESUME / NEXT_STEP(has next)── paused <──PAUSE── cooking
//! cooking ──NEXT_STEP/STEP_COMPLETE(last) | RECIPE_COMPLETE──> complete
//! any ──EXIT──> idle
//! ```

use serde::Serialize;

use super::event::{EventKind, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Any,
    Phase(Phase),
}

impl Source {
    pub fn matches(&self, phase: Phase) -> bool {
        match self {
            Source::Any => true,
            Source::Phase(p) => *p == phase,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    Always,
    /// `current_step < total_steps - 1`
    HasNextStep,
    /// `current_step > 0`
    HasPrevStep,
    /// `current_step >= total_steps - 1`
    IsLastStep,
    /// More than the cooldown window since the last accepted gesture.
    GestureNotOnCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    ClearError,
    StoreError,
    IncrementStep,
    DecrementStep,
    ClampStep,
    RecordGesture,
    ResetContext,
    SetDetectorReady,
    SetVoiceReady,
    SetTotalSteps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Stay,
    Phase(Phase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Source,
    pub on: EventKind,
    pub guard: Guard,
    pub action: Action,
    pub to: Target,
}

const fn row(from: Source, on: EventKind, guard: Guard, action: Action, to: Target) -> Transition {
    Transition {
        from,
        on,
        guard,
        action,
        to,
    }
}

use Action as A;
use EventKind as E;
use Guard as G;
use Phase as P;

const IDLE: Source = Source::Phase(P::Idle);
const INITIALIZING: Source = Source::Phase(P::Initializing);
const READY: Source = Source::Phase(P::Ready);
const COOKING: Source = Source::Phase(P::Cooking);
const PAUSED: Source = Source::Phase(P::Paused);

const fn to(phase: Phase) -> Target {
    Target::Phase(phase)
}

pub const TRANSITIONS: &[Transition] = &[
    row(IDLE, E::Init, G::Always, A::ClearError, to(P::Initializing)),
    row(IDLE, E::Start, G::Always, A::None, to(P::Cooking)),
    row(INITIALIZING, E::Loaded, G::Always, A::None, to(P::Ready)),
    row(INITIALIZING, E::LoadError, G::Always, A::StoreError, to(P::Ready)),
    row(READY, E::Start, G::Always, A::None, to(P::Cooking)),
    row(COOKING, E::Pause, G::Always, A::None, to(P::Paused)),
    row(COOKING, E::NextStep, G::IsLastStep, A::ClampStep, to(P::Complete)),
    row(COOKING, E::NextStep, G::HasNextStep, A::IncrementStep, to(P::Cooking)),
    row(COOKING, E::PrevStep, G::HasPrevStep, A::DecrementStep, to(P::Cooking)),
    row(COOKING, E::StepComplete, G::IsLastStep, A::ClampStep, to(P::Complete)),
    row(COOKING, E::StepComplete, G::HasNextStep, A::IncrementStep, to(P::Cooking)),
    row(COOKING, E::RecipeComplete, G::Always, A::ClampStep, to(P::Complete)),
    row(COOKING, E::Gesture, G::GestureNotOnCooldown, A::RecordGesture, Target::Stay),
    row(COOKING, E::VoiceCommand, G::Always, A::None, Target::Stay),
    row(COOKING, E::TimerDone, G::Always, A::None, Target::Stay),
    row(PAUSED, E::Resume, G::Always, A::None, to(P::Cooking)),
    row(PAUSED, E::NextStep, G::HasNextStep, A::IncrementStep, to(P::Cooking)),
    row(Source::Any, E::Exit, G::Always, A::ResetContext, to(P::Idle)),
    row(Source::Any, E::SetDetectorReady, G::Always, A::SetDetectorReady, Target::Stay),
    row(Source::Any, E::SetVoiceReady, G::Always, A::SetVoiceReady, Target::Stay),
    row(Source::Any, E::SetTotalSteps, G::Always, A::SetTotalSteps, Target::Stay),
];

/// Rows that could fire for `kind` in `phase`, in priority order.
pub fn candidates(phase: Phase, kind: EventKind) -> impl Iterator<Item = &'static Transition> {
    TRANSITIONS
        .iter()
        .filter(move |t| t.on == kind && t.from.matches(phase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_only_leaves_on_exit() {
        let leaving: Vec<_> = TRANSITIONS
            .iter()
            .filter(|t| t.from.matches(P::Complete))
            .filter(|t| matches!(t.to, Target::Phase(p) if p != P::Complete))
            .collect();
        assert_eq!(leaving.len(), 1);
        assert_eq!(leaving[0].on, E::Exit);
    }

    #[test]
    fn nothing_enters_step_transitioning() {
        assert!(TRANSITIONS
            .iter()
            .all(|t| t.to != Target::Phase(P::StepTransitioning)));
    }

    #[test]
    fn context_updates_never_change_phase() {
        for kind in [E::SetDetectorReady, E::SetVoiceReady, E::SetTotalSteps] {
            let rows: Vec<_> = TRANSITIONS.iter().filter(|t| t.on == kind).collect();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].from, Source::Any);
            assert_eq!(rows[0].to, Target::Stay);
        }
    }

    #[test]
    fn last_step_guard_precedes_increment() {
        let rows: Vec<_> = candidates(P::Cooking, E::NextStep).collect();
        assert_eq!(rows[0].guard, G::IsLastStep);
        assert_eq!(rows[1].guard, G::HasNextStep);
    }
}
