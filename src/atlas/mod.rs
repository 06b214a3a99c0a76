mod builder;
mod types;

pub use builder::{AtlasBuilder, pack};
pub use types::Atlas;
