use super::tree::SearchTree;
use crate::error::{GenreSearchError, Result};
use crate::types::{GenreSearchResult, HypothesisStats};
use std::collections::BTreeMap;

/// Turn root statistics into the final genre and a normalised confidence map.
///
/// Only root children with at least one visit take part. The genre with the
/// highest average reward wins, earlier genres winning ties.
pub fn aggregate(tree: &SearchTree, genres: &[String], iterations: usize) -> Result<GenreSearchResult> {
    let hypotheses: Vec<HypothesisStats> = tree
        .root_children(genres)
        .filter(|(_, node)| node.visit_count() > 0)
        .map(|(genre, node)| HypothesisStats {
            genre: genre.to_string(),
            visits: node.visit_count(),
            average_reward: node.average_reward(),
        })
        .collect();

    let mut best: Option<&HypothesisStats> = None;
    for stats in &hypotheses {
        match best {
            Some(current) if stats.average_reward <= current.average_reward => {}
            _ => best = Some(stats),
        }
    }
    let best = best.ok_or(GenreSearchError::NoHypothesesExplored)?;

    let total: f64 = hypotheses.iter().map(|h| h.average_reward).sum();
    let confidence_by_label: BTreeMap<String, f64> = if total > 0.0 {
        hypotheses
            .iter()
            .map(|h| (h.genre.clone(), h.average_reward / total))
            .collect()
    } else {
        // Every explored average is zero: spread the mass evenly
        let share = 1.0 / hypotheses.len() as f64;
        hypotheses.iter().map(|h| (h.genre.clone(), share)).collect()
    };

    Ok(GenreSearchResult {
        genre: best.genre.clone(),
        confidence_by_label,
        iterations,
        hypotheses,
    })
}
