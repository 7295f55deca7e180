use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The ten GTZAN genre labels the bias table and default universe are built around
pub const GTZAN_GENRES: [&str; 10] = [
    "blues", "classical", "country", "disco", "hiphop", "jazz", "metal", "pop", "reggae", "rock",
];

/// Genre universe as owned labels, in canonical order
pub fn default_genres() -> Vec<String> {
    GTZAN_GENRES.iter().map(|g| g.to_string()).collect()
}

/// Named audio descriptors (tempo, rms_avg, mfcc1_avg, ...)
///
/// Values are never mutated in place once produced; derived vectors are built
/// with [`FeatureVector::with_scaled`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy of this vector with `name` multiplied by `factor`.
    /// Returns `None` when the feature is absent.
    pub fn with_scaled(&self, name: &str, factor: f64) -> Option<Self> {
        let current = self.get(name)?;
        let mut values = self.values.clone();
        values.insert(name.to_string(), current * factor);
        Some(Self { values })
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Classifier output for a single feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub genre: String,
    pub confidence_scores: HashMap<String, f64>,
}

/// Accumulated statistics for one explored root hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisStats {
    pub genre: String,
    pub visits: u64,
    pub average_reward: f64,
}

/// Final decision of a genre search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreSearchResult {
    pub genre: String,
    pub confidence_by_label: BTreeMap<String, f64>,
    pub iterations: usize,
    pub hypotheses: Vec<HypothesisStats>,
}

impl GenreSearchResult {
    /// Confidence for `genre`; genres that were never explored count as 0.
    pub fn confidence(&self, genre: &str) -> f64 {
        self.confidence_by_label.get(genre).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_scaled_leaves_original_untouched() {
        let original: FeatureVector = [("tempo", 120.0), ("rms_avg", 0.2)].into_iter().collect();
        let scaled = original.with_scaled("tempo", 0.5).unwrap();

        assert_eq!(original.get("tempo"), Some(120.0));
        assert_eq!(scaled.get("tempo"), Some(60.0));
        assert_eq!(scaled.get("rms_avg"), Some(0.2));
    }

    #[test]
    fn test_with_scaled_missing_feature() {
        let original: FeatureVector = [("tempo", 120.0)].into_iter().collect();
        assert!(original.with_scaled("mfcc1_avg", 1.2).is_none());
    }

    #[test]
    fn test_missing_confidence_is_zero() {
        let result = GenreSearchResult {
            genre: "rock".to_string(),
            confidence_by_label: [("rock".to_string(), 1.0)].into_iter().collect(),
            iterations: 1,
            hypotheses: Vec::new(),
        };
        assert_eq!(result.confidence("jazz"), 0.0);
    }
}
