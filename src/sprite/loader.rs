use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, info};
use rayon::prelude::*;

use super::SourceSprite;
use crate::error::AtlasError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tga"];

/// Image path with its base directory for computing relative paths
struct ImagePath {
    path: PathBuf,
    base: Option<PathBuf>,
}

/// Load sprites from input paths (files or directories)
///
/// The returned order is the discovery order: inputs as given, directory
/// contents sorted by path. Sprite indices in the packed atlas follow it.
///
/// When `base_dir` is provided, individual file inputs will have their sprite
/// names computed as paths relative to that directory.
pub fn load_sprites(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<SourceSprite>> {
    let image_paths = collect_image_paths(inputs, base_dir)?;

    if image_paths.is_empty() {
        return Err(AtlasError::NoImages.into());
    }

    info!("Loading {} images...", image_paths.len());

    // Indexed parallel collect keeps input order
    image_paths
        .par_iter()
        .map(|img_path| load_single_sprite(&img_path.path, img_path.base.as_deref()))
        .collect()
}

/// Read an ordering file: one image path per line, relative to the file's
/// directory. Blank lines and `#` comments are skipped.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file list: {}", path.display()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(parse_file_list(&content, dir))
}

fn parse_file_list(content: &str, dir: &Path) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| dir.join(line))
        .collect()
}

fn collect_image_paths(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(AtlasError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: base_dir.map(Path::to_path_buf),
                });
            } else {
                debug!("Skipping unsupported file {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_single_sprite(path: &Path, base: Option<&Path>) -> Result<SourceSprite> {
    let image = ImageReader::open(path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let name = sprite_name(path, base);
    debug!("Loaded {} ({}x{})", name, image.width(), image.height());

    Ok(SourceSprite {
        path: path.to_path_buf(),
        name,
        image,
    })
}

/// Relative path for directory inputs, file name for individual files
fn sprite_name(path: &Path, base: Option<&Path>) -> String {
    match base {
        Some(base_dir) => path
            .strip_prefix(base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/"),
        None => path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
    }
}
