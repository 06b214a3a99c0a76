pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{Atlas, AtlasBuilder, pack};
pub use cli::{CliArgs, Command, CommonArgs, ScanStep};
pub use error::{AtlasError, Axis};
pub use packing::Rect;
pub use sprite::SourceSprite;
