use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Scanpack configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanpackConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths or glob patterns
    pub input: Vec<String>,
    /// Ordering file listing inputs one per line (optional)
    pub file_list: Option<String>,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json, etc.)
    pub name: String,
    /// Output format: "json" or "binary"
    pub format: Option<String>,
    /// Maximum atlas width and height in pixels
    pub max_size: u32,
    /// Transparent border around each sprite in pixels
    pub border: u32,
    /// Extrude sprite edges into their border by N pixels
    pub extrude: u32,
    /// Vertical scan step: "edge" or "pixel"
    pub scan_step: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
}

impl Default for ScanpackConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            file_list: None,
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            format: None,
            max_size: 4096,
            border: 1,
            extrude: 0,
            scan_step: "edge".to_string(),
            compress: None,
            opaque: false,
        }
    }
}
