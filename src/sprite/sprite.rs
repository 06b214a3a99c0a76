use image::RgbaImage;
use std::path::PathBuf;

/// A decoded sprite ready for packing
#[derive(Debug, Clone)]
pub struct SourceSprite {
    /// Original file path
    pub path: PathBuf,
    /// Identifier written to manifests (relative path or file name)
    pub name: String,
    /// RGBA pixel data
    pub image: RgbaImage,
}

impl SourceSprite {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
