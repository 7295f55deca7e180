use crate::config::{ExpansionOrder, SearchConfig, WindowConfig};
use crate::engines::search::GenreSearchEngine;
use crate::error::Result;
use crate::ml::{FeatureExtractor, GenreClassifier};
use crate::types::GenreSearchResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowClassification {
    pub index: usize,
    pub start_sample: usize,
    pub result: GenreSearchResult,
}

/// Runs one independent genre search per audio window, in parallel.
///
/// Every window gets its own tree; only the classifier and extractor are
/// shared between threads.
pub struct WindowedClassifier {
    window: WindowConfig,
    engine: GenreSearchEngine,
}

impl WindowedClassifier {
    pub fn new(window: WindowConfig, engine: GenreSearchEngine) -> Self {
        Self { window, engine }
    }

    /// `(start, end)` sample ranges of the windows analysed for `len` samples
    pub fn window_bounds(&self, len: usize) -> Vec<(usize, usize)> {
        let size = self.window.window_size.max(1);
        let min_len = (size as f64 * self.window.min_window_fraction).ceil() as usize;

        (0..len)
            .step_by(size)
            .map(|start| (start, (start + size).min(len)))
            .filter(|(start, end)| end - start == size || end - start >= min_len.max(1))
            .collect()
    }

    pub fn classify<E, C>(
        &self,
        samples: &[f32],
        extractor: &E,
        classifier: &C,
    ) -> Result<Vec<WindowClassification>>
    where
        E: FeatureExtractor + ?Sized,
        C: GenreClassifier + ?Sized,
    {
        let bounds = self.window_bounds(samples.len());
        log::debug!(
            "Classifying {} windows of {} samples",
            bounds.len(),
            self.window.window_size
        );

        bounds
            .par_iter()
            .enumerate()
            .map(|(index, &(start, end))| {
                let features = extractor.extract(&samples[start..end], self.window.sample_rate)?;
                let result = match self.engine.config().expansion_order {
                    ExpansionOrder::Sequential => self.engine.classify(features, classifier)?,
                    ExpansionOrder::Seeded { seed } => self
                        .window_engine(seed.wrapping_add(index as u64))
                        .classify(features, classifier)?,
                };
                Ok(WindowClassification {
                    index,
                    start_sample: start,
                    result,
                })
            })
            .collect()
    }

    fn window_engine(&self, seed: u64) -> GenreSearchEngine {
        let config = SearchConfig {
            expansion_order: ExpansionOrder::Seeded { seed },
            ..self.engine.config().clone()
        };
        GenreSearchEngine::new(config, self.engine.bias_model().clone())
    }
}
