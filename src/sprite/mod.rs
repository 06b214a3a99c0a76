mod loader;
mod sprite;

pub use loader::{load_sprites, read_file_list};
pub use sprite::SourceSprite;
