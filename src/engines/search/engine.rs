use super::aggregation::aggregate;
use super::node::NodeId;
use super::progress::{SearchProgressCallback, SilentProgress};
use super::tree::SearchTree;
use super::ucb::select_child;
use crate::config::search::{validate_genres, ExpansionOrder, SearchConfig};
use crate::config::ConfigSection;
use crate::engines::bias::GenreBiasModel;
use crate::error::{GenreSearchError, Result};
use crate::ml::GenreClassifier;
use crate::types::{FeatureVector, GenreSearchResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Monte-Carlo tree search over genre hypotheses.
///
/// Each iteration selects a node by UCB, expands one unexplored genre under
/// it, scores the new hypothesis with the classifier and propagates the score
/// back to the root. After the last iteration the root's children are
/// aggregated into a genre and a confidence distribution.
///
/// The engine holds no per-search state, so one instance can serve many
/// searches, including from several threads at once.
pub struct GenreSearchEngine {
    config: SearchConfig,
    bias_model: GenreBiasModel,
}

impl GenreSearchEngine {
    pub fn new(config: SearchConfig, bias_model: GenreBiasModel) -> Self {
        Self { config, bias_model }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn bias_model(&self) -> &GenreBiasModel {
        &self.bias_model
    }

    /// Build a fresh tree for `features` and search it with the configured
    /// genre universe and iteration count.
    pub fn classify<C>(&self, features: FeatureVector, classifier: &C) -> Result<GenreSearchResult>
    where
        C: GenreClassifier + ?Sized,
    {
        let mut tree = SearchTree::new(features);
        self.search(&mut tree, classifier, &self.config.genres, self.config.iterations)
    }

    pub fn search<C>(
        &self,
        tree: &mut SearchTree,
        classifier: &C,
        genres: &[String],
        iterations: usize,
    ) -> Result<GenreSearchResult>
    where
        C: GenreClassifier + ?Sized,
    {
        self.search_with_progress(tree, classifier, genres, iterations, &mut SilentProgress)
    }

    /// Run exactly `iterations` select/expand/simulate/backpropagate rounds.
    ///
    /// A classifier error aborts the whole search before the failing round
    /// touches any statistics.
    pub fn search_with_progress<C, P>(
        &self,
        tree: &mut SearchTree,
        classifier: &C,
        genres: &[String],
        iterations: usize,
        progress: &mut P,
    ) -> Result<GenreSearchResult>
    where
        C: GenreClassifier + ?Sized,
        P: SearchProgressCallback,
    {
        self.config.validate()?;
        validate_genres(genres)?;
        for genre in genres {
            if !classifier.labels().contains(genre) {
                log::warn!(
                    "Classifier cannot score '{}'; it will receive the fallback reward {}",
                    genre,
                    self.config.fallback_score
                );
            }
        }

        let mut rng = match self.config.expansion_order {
            ExpansionOrder::Sequential => None,
            ExpansionOrder::Seeded { seed } => Some(StdRng::seed_from_u64(seed)),
        };

        for iteration in 0..iterations {
            let selected = self.select(tree, genres);
            let leaf = self.expand(tree, selected, genres, rng.as_mut())?;
            let (genre, reward) = self.simulate(tree, leaf, classifier)?;
            tree.backpropagate(leaf, reward);

            log::trace!("Iteration {}: {} -> {:.4}", iteration + 1, genre, reward);
            progress.on_iteration_complete(iteration, iterations, &genre, reward);
        }

        let result = aggregate(tree, genres, iterations)?;
        log::info!(
            "Genre search finished after {} iterations: {} ({} hypotheses, {} nodes)",
            iterations,
            result.genre,
            result.hypotheses.len(),
            tree.len()
        );
        progress.on_search_complete(&result);

        Ok(result)
    }

    /// Descend through fully expanded nodes by UCB until reaching one that
    /// still has unexplored genres or has no children at all.
    fn select(&self, tree: &SearchTree, genres: &[String]) -> NodeId {
        let mut current = SearchTree::ROOT;
        loop {
            let node = tree.node(current);
            if !node.has_children() || !node.is_fully_expanded(genres) {
                return current;
            }
            match select_child(tree, current, genres, self.config.exploration_weight) {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// Attach one new hypothesis under `selected` and return it. Nodes at the
    /// depth limit, or with every genre already expanded, are returned as-is.
    fn expand(
        &self,
        tree: &mut SearchTree,
        selected: NodeId,
        genres: &[String],
        rng: Option<&mut StdRng>,
    ) -> Result<NodeId> {
        let node = tree.node(selected);
        if node.depth() >= self.config.max_depth || node.is_fully_expanded(genres) {
            return Ok(selected);
        }

        let unexpanded: Vec<&String> = genres.iter().filter(|g| node.child(g).is_none()).collect();
        let genre = match rng {
            Some(rng) => unexpanded.choose(rng).copied(),
            None => unexpanded.first().copied(),
        };
        let Some(genre) = genre else {
            return Ok(selected);
        };

        // Bias first so an unknown genre leaves the tree untouched
        let features = self.bias_model.apply(node.features(), genre)?;
        let child = tree.add_child(selected, genre, features)?;
        log::debug!("Expanded '{}' at depth {}", genre, tree.node(child).depth());

        Ok(child)
    }

    /// Score the hypothesis on the edge leading into `leaf`.
    fn simulate<C>(&self, tree: &SearchTree, leaf: NodeId, classifier: &C) -> Result<(String, f64)>
    where
        C: GenreClassifier + ?Sized,
    {
        let genre = tree
            .edge_label(leaf)
            .ok_or(GenreSearchError::RootSimulation)?
            .to_string();

        let prediction = classifier.predict(tree.node(leaf).features())?;
        let reward = match prediction.confidence_scores.get(&genre) {
            Some(score) => *score,
            None => {
                log::warn!(
                    "Classifier reported no score for '{}', using fallback {}",
                    genre,
                    self.config.fallback_score
                );
                self.config.fallback_score
            }
        };

        Ok((genre, reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Prediction;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        labels: Vec<String>,
        scores: HashMap<String, f64>,
    }

    impl FixedClassifier {
        fn new(scores: &[(&str, f64)]) -> Self {
            Self {
                labels: scores.iter().map(|(g, _)| g.to_string()).collect(),
                scores: scores.iter().map(|(g, s)| (g.to_string(), *s)).collect(),
            }
        }
    }

    impl GenreClassifier for FixedClassifier {
        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn predict(&self, _features: &FeatureVector) -> Result<Prediction> {
            Ok(Prediction {
                genre: self.labels[0].clone(),
                confidence_scores: self.scores.clone(),
            })
        }
    }

    /// Fails on the n-th call
    struct FailingClassifier {
        labels: Vec<String>,
        calls: AtomicUsize,
        fail_at: usize,
    }

    impl GenreClassifier for FailingClassifier {
        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn predict(&self, _features: &FeatureVector) -> Result<Prediction> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_at {
                return Err(GenreSearchError::Classifier("model unavailable".to_string()));
            }
            Ok(Prediction {
                genre: self.labels[0].clone(),
                confidence_scores: self.labels.iter().map(|l| (l.clone(), 0.5)).collect(),
            })
        }
    }

    fn genres(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|g| g.to_string()).collect()
    }

    fn features() -> FeatureVector {
        [("tempo", 120.0), ("rms_avg", 0.3), ("zero_crossing_rate_avg", 0.1)]
            .into_iter()
            .collect()
    }

    fn engine() -> GenreSearchEngine {
        GenreSearchEngine::new(SearchConfig::default(), GenreBiasModel::standard())
    }

    #[test]
    fn test_first_iterations_expand_distinct_genres() {
        let universe = genres(&["blues", "jazz", "rock"]);
        let classifier = FixedClassifier::new(&[("blues", 0.9), ("jazz", 0.05), ("rock", 0.05)]);
        let mut tree = SearchTree::new(features());

        engine().search(&mut tree, &classifier, &universe, 2).unwrap();

        let root = tree.root();
        assert_eq!(root.children().len(), 2);
        assert!(root.child("blues").is_some());
        assert!(root.child("jazz").is_some());
        assert!(root.child("rock").is_none());
    }

    #[test]
    fn test_tree_stays_one_level_deep() {
        let universe = genres(&["rock", "jazz"]);
        let classifier = FixedClassifier::new(&[("rock", 0.9), ("jazz", 0.1)]);
        let mut tree = SearchTree::new(features());

        engine().search(&mut tree, &classifier, &universe, 25).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().visit_count(), 25);
    }

    #[test]
    fn test_deeper_trees_when_allowed() {
        let config = SearchConfig {
            max_depth: 2,
            ..Default::default()
        };
        let engine = GenreSearchEngine::new(config, GenreBiasModel::standard());
        let universe = genres(&["rock", "jazz"]);
        let classifier = FixedClassifier::new(&[("rock", 0.9), ("jazz", 0.1)]);
        let mut tree = SearchTree::new(features());

        engine.search(&mut tree, &classifier, &universe, 6).unwrap();

        let rock = tree.root().child("rock").unwrap();
        assert!(tree.get(rock).unwrap().has_children());
        assert!(tree.len() > 3);
    }

    #[test]
    fn test_missing_label_uses_fallback_reward() {
        let universe = genres(&["rock"]);
        let classifier = FixedClassifier::new(&[("jazz", 1.0)]);
        let mut tree = SearchTree::new(features());

        let result = engine().search(&mut tree, &classifier, &universe, 3).unwrap();

        assert_eq!(result.genre, "rock");
        assert!((result.hypotheses[0].average_reward - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_empty_universe_is_rejected() {
        let classifier = FixedClassifier::new(&[("rock", 1.0)]);
        let mut tree = SearchTree::new(features());
        let err = engine().search(&mut tree, &classifier, &[], 5).unwrap_err();
        assert!(matches!(err, GenreSearchError::Configuration(_)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_classifier_failure_aborts_without_partial_stats() {
        let universe = genres(&["rock", "jazz"]);
        let classifier = FailingClassifier {
            labels: universe.clone(),
            calls: AtomicUsize::new(0),
            fail_at: 3,
        };
        let mut tree = SearchTree::new(features());

        let err = engine().search(&mut tree, &classifier, &universe, 10).unwrap_err();

        assert!(matches!(err, GenreSearchError::Classifier(_)));
        assert_eq!(tree.root().visit_count(), 2);
        assert!((tree.root().total_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_expansion_is_reproducible() {
        let config = SearchConfig {
            expansion_order: ExpansionOrder::Seeded { seed: 42 },
            ..Default::default()
        };
        let engine = GenreSearchEngine::new(config, GenreBiasModel::standard());
        let universe = genres(&["blues", "jazz", "rock", "pop", "metal"]);
        let classifier = FixedClassifier::new(&[("blues", 0.2), ("jazz", 0.2), ("rock", 0.3), ("pop", 0.2), ("metal", 0.1)]);

        let mut first = SearchTree::new(features());
        let mut second = SearchTree::new(features());
        let a = engine.search(&mut first, &classifier, &universe, 12).unwrap();
        let b = engine.search(&mut second, &classifier, &universe, 12).unwrap();

        assert_eq!(first, second);
        assert_eq!(a, b);
        assert_eq!(a.genre, "rock");
        assert_eq!(first.root().children().len(), 5);
    }

    #[test]
    fn test_invalid_engine_config_is_rejected() {
        let universe = genres(&["rock", "jazz"]);
        let classifier = FixedClassifier::new(&[("jazz", 1.0)]);

        let configs = [
            SearchConfig {
                fallback_score: 0.0,
                ..Default::default()
            },
            SearchConfig {
                exploration_weight: -5.0,
                ..Default::default()
            },
            SearchConfig {
                max_depth: 0,
                ..Default::default()
            },
        ];

        for config in configs {
            let engine = GenreSearchEngine::new(config, GenreBiasModel::standard());
            let mut tree = SearchTree::new(features());
            let err = engine.search(&mut tree, &classifier, &universe, 10).unwrap_err();
            assert!(matches!(err, GenreSearchError::Configuration(_)));
            assert_eq!(tree.len(), 1);
            assert_eq!(tree.root().visit_count(), 0);
        }
    }

    #[test]
    fn test_classify_uses_configured_universe() {
        let config = SearchConfig {
            iterations: 8,
            genres: genres(&["jazz", "rock"]),
            ..Default::default()
        };
        let engine = GenreSearchEngine::new(config, GenreBiasModel::standard());
        let classifier = FixedClassifier::new(&[("rock", 0.7), ("jazz", 0.3)]);

        let result = engine.classify(features(), &classifier).unwrap();
        assert_eq!(result.genre, "rock");
        assert_eq!(result.iterations, 8);
    }
}
