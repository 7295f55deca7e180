use super::traits::ConfigSection;
use crate::error::GenreSearchError;
use crate::types::default_genres;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub iterations: usize,
    pub exploration_weight: f64,
    pub genres: Vec<String>,
    pub fallback_score: f64,
    pub max_depth: usize,
    pub expansion_order: ExpansionOrder,
}

/// How the next unexpanded genre is chosen at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpansionOrder {
    /// First unexpanded label in genre-universe order
    Sequential,
    /// Uniform pick among unexpanded labels from a seeded generator
    Seeded { seed: u64 },
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            exploration_weight: 1.0,
            genres: default_genres(),
            fallback_score: 0.01,
            max_depth: 1,
            expansion_order: ExpansionOrder::Sequential,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), GenreSearchError> {
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(GenreSearchError::Configuration(
                "Exploration weight must be a finite, non-negative number".to_string(),
            ));
        }
        if !(self.fallback_score > 0.0 && self.fallback_score <= 1.0) {
            return Err(GenreSearchError::Configuration(
                "Fallback score must be in (0, 1]".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(GenreSearchError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        validate_genres(&self.genres)
    }
}

/// A genre universe must be non-empty and free of duplicate labels
pub fn validate_genres(genres: &[String]) -> Result<(), GenreSearchError> {
    if genres.is_empty() {
        return Err(GenreSearchError::Configuration(
            "Genre universe must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for genre in genres {
        if !seen.insert(genre.as_str()) {
            return Err(GenreSearchError::Configuration(format!(
                "Genre '{}' appears more than once",
                genre
            )));
        }
    }
    Ok(())
}
