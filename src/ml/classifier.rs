use crate::error::Result;
use crate::types::{FeatureVector, Prediction};

/// Probabilistic genre classifier consulted once per search iteration.
///
/// Implementations must be side-effect free: the same features always yield
/// the same prediction, and a single instance may serve several searches
/// running on different threads.
pub trait GenreClassifier: Sync {
    /// Fixed, ordered label set the scores are reported over
    fn labels(&self) -> &[String];

    fn predict(&self, features: &FeatureVector) -> Result<Prediction>;
}
