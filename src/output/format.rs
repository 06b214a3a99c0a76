use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::AtlasError;

/// Save atlas image as PNG, optionally with compression
pub fn save_atlas_image(
    atlas: &Atlas,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(atlas, opaque).map_err(|e| AtlasError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| AtlasError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        png_data
    };

    fs::write(path, output_data).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Encode to PNG in memory, dropping alpha for opaque output
fn encode_png(atlas: &Atlas, opaque: bool) -> image::ImageResult<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(atlas.image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)?;
    } else {
        atlas.image.write_to(&mut png_data, ImageFormat::Png)?;
    }
    Ok(png_data.into_inner())
}
