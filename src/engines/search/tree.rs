use super::node::{NodeId, SearchNode};
use crate::error::{GenreSearchError, Result};
use crate::types::FeatureVector;

/// Arena holding every node of one search
///
/// Nodes are owned by the arena and addressed by [`NodeId`]; the root always
/// sits at index 0. A tree belongs to a single search call and is dropped
/// once the result has been aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(root_features: FeatureVector) -> Self {
        Self {
            nodes: vec![SearchNode::root(root_features)],
        }
    }

    pub fn root(&self) -> &SearchNode {
        &self.nodes[Self::ROOT.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a node holding `features` and attaches it under `parent` for
    /// `genre`. Nothing is stored if the edge already exists.
    pub fn add_child(&mut self, parent: NodeId, genre: &str, features: FeatureVector) -> Result<NodeId> {
        let parent_node = self.node(parent);
        if parent_node.child(genre).is_some() {
            return Err(GenreSearchError::DuplicateChild {
                genre: genre.to_string(),
            });
        }

        let child_id = NodeId(self.nodes.len());
        let child = SearchNode::child_of(parent, parent_node.depth(), features);
        self.nodes.push(child);
        self.nodes[parent.index()].add_child(genre, child_id)
    }

    /// Genre on the edge from `id`'s parent to `id`; `None` for the root.
    pub fn edge_label(&self, id: NodeId) -> Option<&str> {
        let parent = self.node(id).parent()?;
        self.node(parent)
            .children()
            .iter()
            .find(|(_, &child)| child == id)
            .map(|(genre, _)| genre.as_str())
    }

    /// Adds one visit and `reward` to `from` and every ancestor up to and
    /// including the root.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.record(reward);
            current = node.parent();
        }
    }

    /// Root children in `genres` order, skipping labels never expanded
    pub fn root_children<'a>(
        &'a self,
        genres: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a SearchNode)> + 'a {
        let root = self.root();
        genres.iter().filter_map(move |genre| {
            root.child(genre)
                .map(|id| (genre.as_str(), self.node(id)))
        })
    }
}
