use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::step::{Deduction, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    StepStart,
    StepComplete,
    TimerTick,
    TimerDone,
    RecipeComplete,
    InventoryDeduct,
}

/// Every state change in the timeline produces one of these.
///
/// Renderers subscribe to them instead of polling the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: TimelineEventKind,
    pub step_index: usize,
    pub step: Option<Step>,
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    /// Only set on `inventory_deduct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduction: Option<Deduction>,
    pub at: DateTime<Utc>,
}

impl TimelineEvent {
    pub fn is(&self, kind: TimelineEventKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case_type() {
        let event = TimelineEvent {
            kind: TimelineEventKind::InventoryDeduct,
            step_index: 2,
            step: None,
            elapsed_secs: 4,
            remaining_secs: 0,
            deduction: Some(Deduction {
                ingredient: "eggs".into(),
                amount: 2.0,
                unit: "pcs".into(),
            }),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "inventory_deduct");
        assert_eq!(json["deduction"]["ingredient"], "eggs");

        let tick = TimelineEvent {
            kind: TimelineEventKind::TimerTick,
            deduction: None,
            ..event
        };
        let json = serde_json::to_value(&tick).unwrap();
        assert_eq!(json["type"], "timer_tick");
        assert!(json.get("deduction").is_none());
    }
}
