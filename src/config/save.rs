use std::path::Path;

use anyhow::{Context, Result};

use super::types::ScanpackConfig;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &ScanpackConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Convert a path to one relative to the base directory.
///
/// If the path cannot be made relative (e.g., different drive on Windows),
/// returns the original path as a string.
pub fn make_relative(path: &Path, base: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(base) {
        relative.to_string_lossy().into_owned()
    } else {
        path.to_string_lossy().into_owned()
    }
}
