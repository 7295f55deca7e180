pub mod traits;
pub mod search;
pub mod classifier;
pub mod windowing;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use search::{ExpansionOrder, SearchConfig};
pub use classifier::ClassifierConfig;
pub use windowing::WindowConfig;
pub use traits::ConfigSection;
