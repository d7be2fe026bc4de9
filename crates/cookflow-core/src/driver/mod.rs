//! Thin wiring between external inputs and the core.
//!
//! Voice phrases and gestures are turned into [`Command`]s here; the state
//! machine never interprets either payload itself.

mod bindings;
mod session;
mod voice;

pub use bindings::GestureBindings;
pub use session::{CookingSession, SessionOutcome};
pub use voice::parse_voice_command;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::SessionEvent;

/// User-level commands a driver may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Resume,
    NextStep,
    PrevStep,
    Exit,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::NextStep => "next_step",
            Command::PrevStep => "prev_step",
            Command::Exit => "exit",
        }
    }

    pub fn event(self) -> SessionEvent {
        match self {
            Command::Start => SessionEvent::Start,
            Command::Pause => SessionEvent::Pause,
            Command::Resume => SessionEvent::Resume,
            Command::NextStep => SessionEvent::NextStep,
            Command::PrevStep => SessionEvent::PrevStep,
            Command::Exit => SessionEvent::Exit,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "pause" => Ok(Command::Pause),
            "resume" => Ok(Command::Resume),
            "next_step" | "next" => Ok(Command::NextStep),
            "prev_step" | "prev" => Ok(Command::PrevStep),
            "exit" => Ok(Command::Exit),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names_round_trip() {
        for c in [
            Command::Start,
            Command::Pause,
            Command::Resume,
            Command::NextStep,
            Command::PrevStep,
            Command::Exit,
        ] {
            assert_eq!(c.as_str().parse::<Command>(), Ok(c));
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{c}\""));
        }
    }
}
