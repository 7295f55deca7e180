use crate::error::{GenreSearchError, Result};
use crate::types::FeatureVector;
use std::collections::HashMap;

/// Index of a node in its [`SearchTree`](super::tree::SearchTree) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One genre hypothesis in the search tree
///
/// The root holds the unperturbed features and no parent. Every other node
/// holds the features produced by biasing its parent's vector toward the
/// genre on the edge that leads to it. `parent` is a plain arena index and
/// is only followed upward during backpropagation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    features: FeatureVector,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
    depth: usize,
    visit_count: u64,
    total_score: f64,
}

impl SearchNode {
    pub fn root(features: FeatureVector) -> Self {
        Self {
            features,
            parent: None,
            children: HashMap::new(),
            depth: 0,
            visit_count: 0,
            total_score: 0.0,
        }
    }

    pub(crate) fn child_of(parent: NodeId, parent_depth: usize, features: FeatureVector) -> Self {
        Self {
            features,
            parent: Some(parent),
            children: HashMap::new(),
            depth: parent_depth + 1,
            visit_count: 0,
            total_score: 0.0,
        }
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn children(&self) -> &HashMap<String, NodeId> {
        &self.children
    }

    pub fn child(&self, genre: &str) -> Option<NodeId> {
        self.children.get(genre).copied()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Registers `child` under `genre`. This is the only way `children` grows.
    pub fn add_child(&mut self, genre: &str, child: NodeId) -> Result<NodeId> {
        if self.children.contains_key(genre) {
            return Err(GenreSearchError::DuplicateChild {
                genre: genre.to_string(),
            });
        }
        self.children.insert(genre.to_string(), child);
        Ok(child)
    }

    pub fn is_fully_expanded(&self, genres: &[String]) -> bool {
        self.children.len() == genres.len()
    }

    /// Running mean reward; 0.0 for an unvisited node, which is a sentinel and
    /// not a real score.
    pub fn average_reward(&self) -> f64 {
        if self.visit_count > 0 {
            self.total_score / self.visit_count as f64
        } else {
            0.0
        }
    }

    pub(crate) fn record(&mut self, reward: f64) {
        self.visit_count += 1;
        self.total_score += reward;
    }
}
