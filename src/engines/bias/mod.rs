pub mod model;

pub use model::{BiasAdjustment, GenreBiasModel};
