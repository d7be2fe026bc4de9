//! # Cookflow Core Library
//!
//! Orchestrates a hands-free cooking session whose steps advance on timers,
//! explicit user commands, voice phrases and noisy gesture detections.
//!
//! ## Architecture
//!
//! - **Session**: a table-driven state machine owning the session phase and
//!   step cursor. It debounces gestures with a cooldown window and decides
//!   whether a stimulus may advance the session.
//! - **Timeline**: a scheduler over an immutable step list. The caller
//!   invokes `tick()` once per second; the engine emits typed events for
//!   every change, including ingredient deductions on step completion.
//! - **Driver**: thin wiring that maps voice phrases and gestures to commands
//!   and keeps the machine and the timeline in lockstep.
//! - **Storage**: TOML configuration under `~/.config/cookflow/`.
//!
//! ## Key Components
//!
//! - [`SessionStateMachine`]: phase and guarded transitions
//! - [`TimelineEngine`]: step cursor, tick clock, event fan-out
//! - [`CookingSession`]: the two above, wired together
//! - [`Config`]: application configuration

pub mod driver;
pub mod error;
pub mod session;
pub mod storage;
pub mod timeline;

pub use driver::{parse_voice_command, Command, CookingSession, GestureBindings, SessionOutcome};
pub use error::{ConfigError, CoreError, ValidationError};
pub use session::{
    EventKind, Gesture, GestureReading, Phase, SessionContext, SessionEvent, SessionSnapshot,
    SessionStateMachine, TransitionRecord,
};
pub use storage::Config;
pub use timeline::{
    Deduction, RecipeFile, Step, StepSource, TickClock, TimelineEngine, TimelineEvent,
    TimelineEventKind, TimelineSnapshot,
};
