use crate::types::GenreSearchResult;

pub trait SearchProgressCallback {
    fn on_iteration_complete(&mut self, iteration: usize, total: usize, genre: &str, reward: f64);
    fn on_search_complete(&mut self, result: &GenreSearchResult);
}

/// Discards every notification
pub struct SilentProgress;

impl SearchProgressCallback for SilentProgress {
    fn on_iteration_complete(&mut self, _iteration: usize, _total: usize, _genre: &str, _reward: f64) {}

    fn on_search_complete(&mut self, _result: &GenreSearchResult) {}
}

/// Logs every `every`-th iteration and the final decision
pub struct LogProgressCallback {
    every: usize,
}

impl LogProgressCallback {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl SearchProgressCallback for LogProgressCallback {
    fn on_iteration_complete(&mut self, iteration: usize, total: usize, genre: &str, reward: f64) {
        let done = iteration + 1;
        if done % self.every == 0 || done == total {
            log::info!("Iteration {}/{}: {} scored {:.4}", done, total, genre, reward);
        }
    }

    fn on_search_complete(&mut self, result: &GenreSearchResult) {
        log::info!(
            "Search complete: {} ({:.1}% confidence)",
            result.genre,
            result.confidence(&result.genre) * 100.0
        );
    }
}

// For feeding a UI thread
pub enum ProgressMessage {
    IterationComplete { iteration: usize, total: usize, genre: String, reward: f64 },
    SearchComplete(GenreSearchResult),
}

pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl SearchProgressCallback for ChannelProgressCallback {
    fn on_iteration_complete(&mut self, iteration: usize, total: usize, genre: &str, reward: f64) {
        let _ = self.sender.send(ProgressMessage::IterationComplete {
            iteration,
            total,
            genre: genre.to_string(),
            reward,
        });
    }

    fn on_search_complete(&mut self, result: &GenreSearchResult) {
        let _ = self.sender.send(ProgressMessage::SearchComplete(result.clone()));
    }
}
