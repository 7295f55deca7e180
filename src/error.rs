use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenreSearchError {
    #[error("Duplicate child: genre '{genre}' is already expanded")]
    DuplicateChild { genre: String },

    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    #[error("No genre hypotheses were explored")]
    NoHypothesesExplored,

    #[error("The root node carries no genre hypothesis and cannot be simulated")]
    RootSimulation,

    #[error("Classifier has not been trained or loaded")]
    ModelNotTrained,

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenreSearchError>;
