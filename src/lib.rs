pub mod config;
pub mod engines;
pub mod error;
pub mod ml;
pub mod types;

pub use engines::{GenreBiasModel, GenreSearchEngine};
pub use error::{GenreSearchError, Result};
pub use types::{FeatureVector, GenreSearchResult, Prediction};
