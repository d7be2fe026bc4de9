//! Session lifecycle: phases, guarded transitions and gesture debouncing.

mod event;
mod gesture;
mod machine;
pub mod table;

pub use event::{EventKind, Phase, SessionEvent};
pub use gesture::{Gesture, GestureReading};
pub use machine::{
    SessionContext, SessionSnapshot, SessionStateMachine, TransitionRecord,
    DEFAULT_GESTURE_COOLDOWN_MS,
};
