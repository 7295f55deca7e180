use super::classifier::GenreClassifier;
use crate::error::{GenreSearchError, Result};
use crate::types::{FeatureVector, Prediction};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const MIN_SCALE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenrePrototype {
    pub genre: String,
    pub features: FeatureVector,
}

/// Ordered prototypes, one per genre, as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrototypeSet {
    pub prototypes: Vec<GenrePrototype>,
}

impl PrototypeSet {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Nearest-prototype classifier with softmax scores.
///
/// Distance to a prototype is the mean squared relative difference over the
/// prototype's features; scores are `softmax(-distance / temperature)`.
pub struct PrototypeClassifier {
    labels: Vec<String>,
    prototypes: Vec<FeatureVector>,
    temperature: f64,
}

impl PrototypeClassifier {
    pub fn new(set: PrototypeSet, temperature: f64) -> Result<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(GenreSearchError::Configuration(
                "Classifier temperature must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut labels = Vec::with_capacity(set.prototypes.len());
        let mut prototypes = Vec::with_capacity(set.prototypes.len());
        for prototype in set.prototypes {
            if !seen.insert(prototype.genre.clone()) {
                return Err(GenreSearchError::Configuration(format!(
                    "Duplicate prototype for genre '{}'",
                    prototype.genre
                )));
            }
            if prototype.features.is_empty() {
                return Err(GenreSearchError::Configuration(format!(
                    "Prototype for genre '{}' has no features",
                    prototype.genre
                )));
            }
            labels.push(prototype.genre);
            prototypes.push(prototype.features);
        }

        Ok(Self {
            labels,
            prototypes,
            temperature,
        })
    }

    pub fn is_trained(&self) -> bool {
        !self.prototypes.is_empty()
    }

    fn distance(features: &FeatureVector, prototype: &FeatureVector) -> Result<f64> {
        let mut sum = 0.0;
        for (name, target) in prototype.iter() {
            let value = features
                .get(name)
                .ok_or_else(|| GenreSearchError::MissingFeature(name.to_string()))?;
            let scale = target.abs().max(MIN_SCALE);
            sum += ((value - target) / scale).powi(2);
        }
        Ok(sum / prototype.len() as f64)
    }
}

impl GenreClassifier for PrototypeClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        if !self.is_trained() {
            return Err(GenreSearchError::ModelNotTrained);
        }

        let logits = self
            .prototypes
            .iter()
            .map(|p| Self::distance(features, p).map(|d| -d / self.temperature))
            .collect::<Result<Vec<f64>>>()?;

        let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let total: f64 = exps.iter().sum();

        let mut best = 0;
        for (i, e) in exps.iter().enumerate() {
            if *e > exps[best] {
                best = i;
            }
        }

        let confidence_scores: HashMap<String, f64> = self
            .labels
            .iter()
            .zip(&exps)
            .map(|(label, e)| (label.clone(), e / total))
            .collect();

        Ok(Prediction {
            genre: self.labels[best].clone(),
            confidence_scores,
        })
    }
}
