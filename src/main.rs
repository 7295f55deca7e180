use anyhow::{Context, Result};
use clap::Parser;
use genre_mcts::config::ConfigManager;
use genre_mcts::engines::search::{LogProgressCallback, SearchTree};
use genre_mcts::ml::{PrototypeClassifier, PrototypeSet};
use genre_mcts::{FeatureVector, GenreBiasModel, GenreSearchEngine};
use std::path::PathBuf;

/// Infer the genre of a pre-extracted feature vector with Monte-Carlo tree search
#[derive(Parser, Debug)]
#[command(name = "genre-mcts", version)]
struct Cli {
    /// JSON object mapping feature names to values
    #[arg(long)]
    features: PathBuf,

    /// JSON prototype set; defaults to `classifier.prototypes_path` from the config
    #[arg(long)]
    prototypes: Option<PathBuf>,

    /// TOML config file, overridable through GENRE_MCTS__<SECTION>__<KEY>
    #[arg(long, env = "GENRE_MCTS_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    exploration_weight: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    manager
        .load_layered(cli.config.as_deref())
        .context("loading configuration")?;
    manager.update(|c| {
        if let Some(iterations) = cli.iterations {
            c.search.iterations = iterations;
        }
        if let Some(weight) = cli.exploration_weight {
            c.search.exploration_weight = weight;
        }
    })?;
    let config = manager.get();

    let prototypes_path = cli
        .prototypes
        .or_else(|| config.classifier.prototypes_path.clone())
        .context("no prototype set given (use --prototypes or classifier.prototypes_path)")?;
    let prototypes = PrototypeSet::from_json_file(&prototypes_path)
        .with_context(|| format!("reading prototypes from {}", prototypes_path.display()))?;
    let classifier = PrototypeClassifier::new(prototypes, config.classifier.temperature)?;
    if !classifier.is_trained() {
        anyhow::bail!("prototype set {} is empty", prototypes_path.display());
    }

    let contents = std::fs::read_to_string(&cli.features)
        .with_context(|| format!("reading features from {}", cli.features.display()))?;
    let features: FeatureVector = serde_json::from_str(&contents).context("parsing features")?;

    let engine = GenreSearchEngine::new(config.search.clone(), GenreBiasModel::standard());
    let mut tree = SearchTree::new(features);
    let mut progress = LogProgressCallback::new(10);
    let result = engine.search_with_progress(
        &mut tree,
        &classifier,
        &config.search.genres,
        config.search.iterations,
        &mut progress,
    )?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
