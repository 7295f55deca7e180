use super::traits::ConfigSection;
use crate::error::GenreSearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Softmax temperature applied to prototype distances
    pub temperature: f64,
    pub prototypes_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            prototypes_path: None,
        }
    }
}

impl ConfigSection for ClassifierConfig {
    fn section_name() -> &'static str {
        "classifier"
    }

    fn validate(&self) -> Result<(), GenreSearchError> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(GenreSearchError::Configuration(
                "Classifier temperature must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
