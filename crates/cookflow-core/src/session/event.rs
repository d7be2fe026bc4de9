use serde::{Deserialize, Serialize};

use super::gesture::Gesture;

/// Coarse lifecycle state of a cooking session. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Initializing,
    Ready,
    Cooking,
    Paused,
    /// Reserved for renderers animating between steps; no transition enters it.
    StepTransitioning,
    Complete,
}

/// Stimuli delivered to the state machine by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    Init,
    Loaded,
    LoadError { message: String },
    Start,
    Pause,
    Resume,
    NextStep,
    PrevStep,
    StepComplete,
    RecipeComplete,
    Gesture { gesture: Gesture, confidence: f32 },
    VoiceCommand { text: String },
    TimerDone,
    Exit,
    SetDetectorReady { ready: bool },
    SetVoiceReady { ready: bool },
    SetTotalSteps { total: usize },
}

/// Payload-free discriminant of [`SessionEvent`], used as the table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Init,
    Loaded,
    LoadError,
    Start,
    Pause,
    Resume,
    NextStep,
    PrevStep,
    StepComplete,
    RecipeComplete,
    Gesture,
    VoiceCommand,
    TimerDone,
    Exit,
    SetDetectorReady,
    SetVoiceReady,
    SetTotalSteps,
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::Init => EventKind::Init,
            SessionEvent::Loaded => EventKind::Loaded,
            SessionEvent::LoadError { .. } => EventKind::LoadError,
            SessionEvent::Start => EventKind::Start,
            SessionEvent::Pause => EventKind::Pause,
            SessionEvent::Resume => EventKind::Resume,
            SessionEvent::NextStep => EventKind::NextStep,
            SessionEvent::PrevStep => EventKind::PrevStep,
            SessionEvent::StepComplete => EventKind::StepComplete,
            SessionEvent::RecipeComplete => EventKind::RecipeComplete,
            SessionEvent::Gesture { .. } => EventKind::Gesture,
            SessionEvent::VoiceCommand { .. } => EventKind::VoiceCommand,
            SessionEvent::TimerDone => EventKind::TimerDone,
            SessionEvent::Exit => EventKind::Exit,
            SessionEvent::SetDetectorReady { .. } => EventKind::SetDetectorReady,
            SessionEvent::SetVoiceReady { .. } => EventKind::SetVoiceReady,
            SessionEvent::SetTotalSteps { .. } => EventKind::SetTotalSteps,
        }
    }
}
