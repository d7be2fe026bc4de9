use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One unit of the timed sequence.
///
/// `duration_secs == 0` marks a manual step: no timer fires and the step only
/// advances through an explicit `complete_step`/`next_step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub duration_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub auto_advance: bool,
}

impl Step {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: String::new(),
            duration_secs,
            ingredient: None,
            amount: None,
            unit: None,
            auto_advance: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_ingredient(
        mut self,
        ingredient: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
    ) -> Self {
        self.ingredient = Some(ingredient.into());
        self.amount = Some(amount);
        self.unit = Some(unit.into());
        self
    }

    pub fn auto_advancing(mut self) -> Self {
        self.auto_advance = true;
        self
    }

    pub fn is_timed(&self) -> bool {
        self.duration_secs > 0
    }

    /// The ingredient consumed by finishing this step, if the step carries
    /// the full ingredient/amount/unit triple.
    pub fn deduction(&self) -> Option<Deduction> {
        match (&self.ingredient, self.amount, &self.unit) {
            (Some(ingredient), Some(amount), Some(unit)) => Some(Deduction {
                ingredient: ingredient.clone(),
                amount,
                unit: unit.clone(),
            }),
            _ => None,
        }
    }

    /// True when some but not all of the ingredient fields are present.
    pub fn has_partial_ingredient(&self) -> bool {
        let present = [
            self.ingredient.is_some(),
            self.amount.is_some(),
            self.unit.is_some(),
        ];
        present.iter().any(|p| *p) && !present.iter().all(|p| *p)
    }
}

/// Ingredient-consumption record announced when a step is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub ingredient: String,
    pub amount: f64,
    pub unit: String,
}

/// Build the step-index → deduction map for a step list.
pub fn deductions_for(steps: &[Step]) -> BTreeMap<usize, Deduction> {
    steps
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.deduction().map(|d| (i, d)))
        .collect()
}

/// Total timed seconds across a step list.
pub fn total_duration_secs(steps: &[Step]) -> u64 {
    steps.iter().map(|s| s.duration_secs).sum()
}
