use std::collections::BTreeMap;

use tracing::warn;

use super::Command;
use crate::session::Gesture;
use crate::storage::GestureConfig;

/// Gesture → command lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureBindings {
    map: BTreeMap<Gesture, Command>,
}

impl GestureBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration, skipping names that are not gestures.
    pub fn from_config(config: &GestureConfig) -> Self {
        let mut bindings = Self::new();
        for (name, command) in &config.bindings {
            match name.parse::<Gesture>() {
                Ok(gesture) => bindings.bind(gesture, *command),
                Err(e) => warn!(binding = %name, "{e}; binding ignored"),
            }
        }
        bindings
    }

    pub fn bind(&mut self, gesture: Gesture, command: Command) {
        self.map.insert(gesture, command);
    }

    pub fn command_for(&self, gesture: Gesture) -> Option<Command> {
        self.map.get(&gesture).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
