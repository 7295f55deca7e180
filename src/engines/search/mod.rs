pub mod node;
pub mod tree;
pub mod ucb;
pub mod aggregation;
pub mod progress;
pub mod engine;

pub use node::{NodeId, SearchNode};
pub use tree::SearchTree;
pub use ucb::{select_child, ucb_score};
pub use aggregation::aggregate;
pub use progress::{
    ChannelProgressCallback, LogProgressCallback, ProgressMessage, SearchProgressCallback,
    SilentProgress,
};
pub use engine::GenreSearchEngine;
