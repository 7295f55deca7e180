use crate::error::Result;
use crate::types::FeatureVector;

/// Turns a block of mono samples into named descriptors.
///
/// Implementations must emit the same keys for every call so that the bias
/// model and classifier see a consistent schema.
pub trait FeatureExtractor: Sync {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FeatureVector>;
}
