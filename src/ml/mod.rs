pub mod classifier;
pub mod features;
pub mod prototype;

pub use classifier::GenreClassifier;
pub use features::FeatureExtractor;
pub use prototype::{PrototypeClassifier, PrototypeSet};
