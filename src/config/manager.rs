use super::{
    classifier::ClassifierConfig, search::SearchConfig, traits::ConfigSection,
    windowing::WindowConfig,
};
use crate::error::GenreSearchError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `GENRE_MCTS__SEARCH__ITERATIONS=200`
pub const ENV_PREFIX: &str = "GENRE_MCTS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
    pub windowing: WindowConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GenreSearchError> {
        validate_section(&self.search)?;
        validate_section(&self.classifier)?;
        validate_section(&self.windowing)?;
        Ok(())
    }
}

/// Tag a section's configuration errors with its TOML table name
fn validate_section<S: ConfigSection>(section: &S) -> Result<(), GenreSearchError> {
    section.validate().map_err(|e| match e {
        GenreSearchError::Configuration(msg) => {
            GenreSearchError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenreSearchError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GenreSearchError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| GenreSearchError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Load an optional TOML file, then apply `GENRE_MCTS__<SECTION>__<KEY>`
    /// environment overrides on top of it.
    pub fn load_layered(&self, path: Option<&Path>) -> Result<(), GenreSearchError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| GenreSearchError::Configuration(format!("Failed to load config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenreSearchError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| GenreSearchError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GenreSearchError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `f` to a copy of the current config; the change is kept only if
    /// the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), GenreSearchError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), GenreSearchError> {
        config.validate()?;
        log::debug!(
            "Config loaded: {} genres, {} iterations",
            config.search.genres.len(),
            config.search.iterations
        );
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
        Ok(())
    }
}
