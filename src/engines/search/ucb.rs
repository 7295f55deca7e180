//! Upper-confidence-bound scoring used while descending the tree.

use super::node::{NodeId, SearchNode};
use super::tree::SearchTree;

/// UCB1 score of `child` under a parent visited `parent_visits` times.
///
/// Unvisited children score `+inf`. A parent with no visits contributes no
/// exploration bonus.
pub fn ucb_score(child: &SearchNode, parent_visits: u64, exploration_weight: f64) -> f64 {
    if child.visit_count() == 0 {
        return f64::INFINITY;
    }

    let visits = child.visit_count() as f64;
    let exploit = child.total_score() / visits;
    let log_parent = if parent_visits == 0 {
        0.0
    } else {
        (parent_visits as f64).ln()
    };
    let explore = exploration_weight * (log_parent / visits).sqrt();

    exploit + explore
}

/// Child of `parent` with the highest UCB score, scanning `genres` in order.
/// The first child wins ties.
pub fn select_child(
    tree: &SearchTree,
    parent: NodeId,
    genres: &[String],
    exploration_weight: f64,
) -> Option<NodeId> {
    let parent_node = tree.get(parent)?;
    let parent_visits = parent_node.visit_count();

    let mut best: Option<(NodeId, f64)> = None;
    for genre in genres {
        let Some(child_id) = parent_node.child(genre) else {
            continue;
        };
        let Some(child) = tree.get(child_id) else {
            continue;
        };
        let score = ucb_score(child, parent_visits, exploration_weight);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((child_id, score)),
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureVector;

    fn genres() -> Vec<String> {
        vec!["rock".to_string(), "jazz".to_string(), "pop".to_string()]
    }

    fn tree_with_children() -> (SearchTree, Vec<NodeId>) {
        let mut tree = SearchTree::new(FeatureVector::default());
        let ids = genres()
            .iter()
            .map(|g| tree.add_child(SearchTree::ROOT, g, FeatureVector::default()).unwrap())
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_unvisited_child_is_infinite() {
        let node = SearchNode::root(FeatureVector::default());
        assert_eq!(ucb_score(&node, 10, 1.0), f64::INFINITY);
    }

    #[test]
    fn test_zero_parent_visits_has_no_bonus() {
        let (mut tree, ids) = tree_with_children();
        tree.backpropagate(ids[0], 0.8);
        let child = tree.get(ids[0]).unwrap();
        assert!((ucb_score(child, 0, 5.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_score_formula() {
        let (mut tree, ids) = tree_with_children();
        tree.backpropagate(ids[0], 0.5);
        tree.backpropagate(ids[0], 0.3);
        let child = tree.get(ids[0]).unwrap();

        let expected = 0.4 + 1.5 * ((10f64).ln() / 2.0).sqrt();
        assert!((ucb_score(child, 10, 1.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_sibling_beats_visited() {
        let (mut tree, ids) = tree_with_children();
        tree.backpropagate(ids[0], 1.0);
        tree.backpropagate(ids[1], 1.0);

        assert_eq!(select_child(&tree, SearchTree::ROOT, &genres(), 1.0), Some(ids[2]));
    }

    #[test]
    fn test_ties_go_to_first_in_universe_order() {
        let (mut tree, ids) = tree_with_children();
        for id in &ids {
            tree.backpropagate(*id, 0.5);
        }
        assert_eq!(select_child(&tree, SearchTree::ROOT, &genres(), 1.0), Some(ids[0]));
    }

    #[test]
    fn test_no_children_selects_nothing() {
        let tree = SearchTree::new(FeatureVector::default());
        assert_eq!(select_child(&tree, SearchTree::ROOT, &genres(), 1.0), None);
    }
}
