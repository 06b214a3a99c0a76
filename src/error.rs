use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Atlas dimension that failed to fit the supported size table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Sprite {index} has invalid dimensions {width}x{height}")]
    InvalidSprite {
        index: usize,
        width: u32,
        height: u32,
    },

    #[error("No sprites to pack")]
    EmptyInput,

    #[error("Atlas {axis} of {required}px exceeds the maximum supported size ({max}px)")]
    AtlasTooLarge { axis: Axis, required: u32, max: u32 },

    #[error("Invalid packer settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Binary atlas table holds at most {max} sprites, got {count}")]
    TooManySprites { count: usize, max: usize },

    #[error("Value {0} does not fit a 16-bit atlas table field")]
    TableOverflow(u32),
}
