use super::traits::ConfigSection;
use crate::error::GenreSearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples per analysis window
    pub window_size: usize,
    pub sample_rate: u32,
    /// A trailing partial window is analysed only if it holds at least this
    /// fraction of `window_size` samples
    pub min_window_fraction: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: 3 * 44_100,
            sample_rate: 44_100,
            min_window_fraction: 0.5,
        }
    }
}

impl ConfigSection for WindowConfig {
    fn section_name() -> &'static str {
        "windowing"
    }

    fn validate(&self) -> Result<(), GenreSearchError> {
        if self.window_size == 0 {
            return Err(GenreSearchError::Configuration(
                "Window size must be positive".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(GenreSearchError::Configuration(
                "Sample rate must be positive".to_string(),
            ));
        }
        if self.min_window_fraction <= 0.0 || self.min_window_fraction > 1.0 {
            return Err(GenreSearchError::Configuration(
                "Minimum window fraction must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
