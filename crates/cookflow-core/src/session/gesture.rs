use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hand-gesture classes produced by the external recognizer.
///
/// The state machine treats these as opaque tokens; mapping a gesture to a
/// command is the driver's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    OpenPalm,
    ClosedFist,
    ThumbUp,
    ThumbDown,
    PointingUp,
    Victory,
    ILoveYou,
}

impl Gesture {
    pub const ALL: [Gesture; 7] = [
        Gesture::OpenPalm,
        Gesture::ClosedFist,
        Gesture::ThumbUp,
        Gesture::ThumbDown,
        Gesture::PointingUp,
        Gesture::Victory,
        Gesture::ILoveYou,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::OpenPalm => "open_palm",
            Gesture::ClosedFist => "closed_fist",
            Gesture::ThumbUp => "thumb_up",
            Gesture::ThumbDown => "thumb_down",
            Gesture::PointingUp => "pointing_up",
            Gesture::Victory => "victory",
            Gesture::ILoveYou => "i_love_you",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gesture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Gesture::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| format!("unknown gesture: {s}"))
    }
}

/// One classification from the recognizer, delivered at any rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureReading {
    pub gesture: Gesture,
    pub confidence: f32,
}
