pub mod bias;
pub mod search;
pub mod windows;

pub use bias::GenreBiasModel;
pub use search::GenreSearchEngine;
pub use windows::{WindowClassification, WindowedClassifier};
