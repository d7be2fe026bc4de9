//! TOML recipe files: the on-disk form of a content provider's step list.
//!
//! ```toml
//! title = "Pancakes"
//! servings = 2
//!
//! [[steps]]
//! id = "whisk"
//! title = "Whisk"
//! text = "Whisk flour and milk."
//! ingredient = "flour"
//! amount = 200.0
//! unit = "g"
//!
//! [[steps]]
//! id = "rest"
//! title = "Rest the batter"
//! duration_secs = 300
//! auto_advance = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::step::Step;
use crate::error::{CoreError, Result, ValidationError};

/// Anything that can hand the session an ordered step list.
pub trait StepSource {
    fn title(&self) -> &str;
    fn steps(&self) -> &[Step];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFile {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl RecipeFile {
    /// Parse and validate a recipe from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let recipe: RecipeFile = toml::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::RecipeRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.steps.is_empty() {
            return Err(ValidationError::EmptyCollection("recipe steps".into()));
        }
        let mut seen = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    step: i,
                    field: "id".into(),
                    message: "must not be empty".into(),
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(ValidationError::DuplicateId(step.id.clone()));
            }
            if let Some(amount) = step.amount {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        step: i,
                        field: "amount".into(),
                        message: format!("{amount} is not a non-negative quantity"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl StepSource for RecipeFile {
    fn title(&self) -> &str {
        &self.title
    }

    fn steps(&self) -> &[Step] {
        &self.steps
    }
}
