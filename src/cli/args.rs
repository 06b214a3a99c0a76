use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scanpack")]
#[command(version, about = "Power-of-two sprite atlas packer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Output a JSON manifest
    Json(CommonArgs),
    /// Output a little-endian binary atlas table plus a sprite id list
    Binary(CommonArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input image files or directories
    #[arg(required_unless_present_any = ["config", "file_list"])]
    pub input: Vec<PathBuf>,

    /// Load settings from a .scanpack config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Text file listing input images in the order they should be indexed
    #[arg(long, value_name = "FILE")]
    pub file_list: Option<PathBuf>,

    /// Output directory for atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas.png, atlas.json, etc.) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Maximum atlas width and height, a power of two up to 4096 [default: 4096]
    #[arg(long)]
    pub max_size: Option<u32>,

    /// Transparent border around each sprite in pixels [default: 1]
    #[arg(short, long)]
    pub border: Option<u32>,

    /// Extrude sprite edges into their border by N pixels [default: 0]
    #[arg(long)]
    pub extrude: Option<u32>,

    /// How the packer moves down when a row is full [default: edge]
    #[arg(long, value_enum)]
    pub scan_step: Option<ScanStep>,

    /// Output RGB instead of RGBA (opaque atlas)
    #[arg(long)]
    pub opaque: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Write the effective settings to a config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Vertical advance used when a sprite runs off the right edge of the atlas
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ScanStep {
    /// Jump straight to the next row where a blocking sprite ends
    #[default]
    #[value(name = "edge")]
    Edge,
    /// Move down one pixel at a time
    #[value(name = "pixel")]
    Pixel,
}

impl ScanStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanStep::Edge => "edge",
            ScanStep::Pixel => "pixel",
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
