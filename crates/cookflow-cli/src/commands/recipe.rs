use std::path::PathBuf;

use clap::Subcommand;
use cookflow_core::timeline::{deductions_for, total_duration_secs};
use cookflow_core::RecipeFile;

#[derive(Subcommand)]
pub enum RecipeAction {
    /// Print a recipe with its derived deductions as JSON
    Show {
        /// Path to a recipe TOML file
        path: PathBuf,
    },
    /// Check a recipe file for errors
    Validate {
        /// Path to a recipe TOML file
        path: PathBuf,
    },
}

pub fn run(action: RecipeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RecipeAction::Show { path } => {
            let recipe = RecipeFile::from_path(&path)?;
            let output = serde_json::json!({
                "title": recipe.title,
                "servings": recipe.servings,
                "total_duration_secs": total_duration_secs(&recipe.steps),
                "deductions": deductions_for(&recipe.steps),
                "steps": recipe.steps,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        RecipeAction::Validate { path } => {
            let recipe = RecipeFile::from_path(&path)?;
            println!("ok: {} steps", recipe.steps.len());
        }
    }
    Ok(())
}
