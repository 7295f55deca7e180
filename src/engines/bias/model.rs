use crate::error::{GenreSearchError, Result};
use crate::types::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multiply `feature` by `factor`, only if `requires` is present too
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAdjustment {
    pub feature: String,
    pub factor: f64,
    #[serde(default)]
    pub requires: Option<String>,
}

impl BiasAdjustment {
    pub fn new(feature: &str, factor: f64) -> Self {
        Self {
            feature: feature.to_string(),
            factor,
            requires: None,
        }
    }

    pub fn requiring(mut self, feature: &str) -> Self {
        self.requires = Some(feature.to_string());
        self
    }
}

/// Nudges a feature vector toward a genre's rough acoustic profile so the
/// classifier gets a differentiated input for every hypothesis.
#[derive(Debug, Clone)]
pub struct GenreBiasModel {
    rules: HashMap<String, Vec<BiasAdjustment>>,
}

impl GenreBiasModel {
    /// Adjustment table covering the ten GTZAN genres
    pub fn standard() -> Self {
        let table: [(&str, &[(&str, f64)]); 10] = [
            ("blues", &[("tempo", 0.9), ("rms_avg", 0.95)]),
            ("classical", &[("tempo", 0.85), ("rms_avg", 0.8), ("rms_std", 1.4)]),
            ("country", &[("tempo", 0.95), ("harmonic_avg", 1.1)]),
            ("disco", &[("tempo", 1.15), ("rms_avg", 1.1), ("mfcc1_avg", 1.15)]),
            ("hiphop", &[("mfcc1_avg", 1.2), ("tempo", 0.9)]),
            ("jazz", &[("mfcc2_avg", 1.15), ("harmonic_avg", 1.2)]),
            ("metal", &[("rms_avg", 1.3), ("tempo", 1.25), ("zero_crossing_rate_avg", 1.3)]),
            ("pop", &[("tempo", 1.05)]),
            ("reggae", &[("tempo", 0.85), ("mfcc4_avg", 1.2)]),
            ("rock", &[("rms_avg", 1.2), ("zero_crossing_rate_avg", 1.2), ("mfcc3_avg", 1.15)]),
        ];

        let mut rules: HashMap<String, Vec<BiasAdjustment>> = table
            .iter()
            .map(|(genre, adjustments)| {
                let adjustments = adjustments
                    .iter()
                    .map(|(feature, factor)| BiasAdjustment::new(feature, *factor))
                    .collect();
                (genre.to_string(), adjustments)
            })
            .collect();

        // The vocal mfcc pair is boosted together or not at all
        if let Some(pop) = rules.get_mut("pop") {
            pop.push(BiasAdjustment::new("mfcc2_avg", 1.1).requiring("mfcc3_avg"));
            pop.push(BiasAdjustment::new("mfcc3_avg", 1.1).requiring("mfcc2_avg"));
        }

        Self { rules }
    }

    pub fn from_rules(rules: HashMap<String, Vec<BiasAdjustment>>) -> Self {
        Self { rules }
    }

    pub fn supports(&self, genre: &str) -> bool {
        self.rules.contains_key(genre)
    }

    /// New vector with `genre`'s adjustments applied to a copy of `features`.
    ///
    /// Adjustments naming a feature the vector lacks are skipped.
    pub fn apply(&self, features: &FeatureVector, genre: &str) -> Result<FeatureVector> {
        let adjustments = self
            .rules
            .get(genre)
            .ok_or_else(|| GenreSearchError::UnknownGenre(genre.to_string()))?;

        let mut adjusted = features.clone();
        for adjustment in adjustments {
            if let Some(required) = &adjustment.requires {
                if !features.contains(required) {
                    log::trace!(
                        "Skipping {} bias on '{}': '{}' is missing",
                        genre,
                        adjustment.feature,
                        required
                    );
                    continue;
                }
            }
            match adjusted.with_scaled(&adjustment.feature, adjustment.factor) {
                Some(next) => adjusted = next,
                None => log::trace!(
                    "Skipping {} bias on missing feature '{}'",
                    genre,
                    adjustment.feature
                ),
            }
        }

        Ok(adjusted)
    }
}

impl Default for GenreBiasModel {
    fn default() -> Self {
        Self::standard()
    }
}
