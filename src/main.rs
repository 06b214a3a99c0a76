use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use scanpack::atlas::AtlasBuilder;
use scanpack::cli::{CliArgs, Command, CommonArgs, CompressionLevel, ScanStep};
use scanpack::config::{CompressConfig, LoadedConfig, ScanpackConfig, make_relative, save_config};
use scanpack::output::{save_atlas_image, write_binary, write_json};
use scanpack::sprite::{load_sprites, read_file_list};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let (args, format) = match &cli.command {
        Command::Json(args) => (args, "json"),
        Command::Binary(args) => (args, "binary"),
    };

    let merged = merge_config_with_args(args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Scanpack atlas packer v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.save_config {
        save_config(&merged.to_config(path, format), path)?;
        info!("Saved settings to {}", path.display());
    }

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output).with_context(|| {
            format!("failed to create output directory: {}", merged.output.display())
        })?;
    }

    let sprites = load_sprites(&merged.input, merged.base_dir.as_deref())?;
    info!("Loaded {} sprites", sprites.len());

    let images: Vec<_> = sprites.iter().map(|sprite| &sprite.image).collect();
    let atlas = AtlasBuilder::new()
        .max_size(merged.max_size)
        .border(merged.border)
        .extrude(merged.extrude)
        .scan_step(merged.scan_step)
        .pack(&images)?;

    let image_path = merged.output.join(format!("{}.png", merged.name));
    save_atlas_image(&atlas, &image_path, merged.opaque, merged.compress)?;
    info!("Saved {}", image_path.display());

    match &cli.command {
        Command::Json(_) => {
            write_json(&atlas, &sprites, &merged.output, &merged.name)?;
            info!("Generated {}.json", merged.name);
        }
        Command::Binary(_) => {
            write_binary(&atlas, &sprites, &merged.output, &merged.name)?;
            info!("Generated {0}.atlas and {0}.atlasid", merged.name);
        }
    }

    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    /// Directory sprite names are made relative to, for file inputs
    base_dir: Option<PathBuf>,
    file_list: Option<PathBuf>,
    output: PathBuf,
    name: String,
    max_size: u32,
    border: u32,
    extrude: u32,
    scan_step: ScanStep,
    opaque: bool,
    verbose: bool,
    compress: Option<CompressionLevel>,
}

impl MergedConfig {
    /// Settings file equivalent of this run, paths relative to `path`'s directory
    fn to_config(&self, path: &Path, format: &str) -> ScanpackConfig {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let dir = fs::canonicalize(dir).unwrap_or_else(|_e| dir.to_path_buf());
        let relative = |p: &Path| {
            let absolute = fs::canonicalize(p).unwrap_or_else(|_e| p.to_path_buf());
            make_relative(&absolute, &dir)
        };

        ScanpackConfig {
            // Inputs expanded from a file list are not written back
            input: if self.file_list.is_some() {
                Vec::new()
            } else {
                self.input.iter().map(|p| relative(p)).collect()
            },
            file_list: self.file_list.as_deref().map(relative),
            output_dir: relative(&self.output),
            name: self.name.clone(),
            format: Some(format.to_string()),
            max_size: self.max_size,
            border: self.border,
            extrude: self.extrude,
            scan_step: self.scan_step.as_str().to_string(),
            compress: self.compress.map(|level| match level {
                CompressionLevel::Level(n) => CompressConfig::Level(n),
                CompressionLevel::Max => CompressConfig::Max("max".to_string()),
            }),
            opaque: self.opaque,
            ..ScanpackConfig::default()
        }
    }
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CommonArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Ordering file: CLI > config
    let file_list = args
        .file_list
        .clone()
        .or_else(|| loaded_config.as_ref().and_then(LoadedConfig::resolve_file_list));

    // Input files: file list > CLI > config
    let (input, base_dir) = if let Some(list_path) = &file_list {
        let input = read_file_list(list_path)?;
        let base = list_path.parent().map(Path::to_path_buf);
        (input, base)
    } else if !args.input.is_empty() {
        (args.input.clone(), None)
    } else if let Some(ref lc) = loaded_config {
        (lc.resolve_inputs()?, Some(lc.config_dir.clone()))
    } else {
        (Vec::new(), None)
    };

    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_output_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    let defaults = ScanpackConfig::default();
    let config = loaded_config.as_ref().map(|lc| &lc.config).unwrap_or(&defaults);

    let max_size = args.max_size.unwrap_or(config.max_size);
    let border = args.border.unwrap_or(config.border);
    let extrude = args.extrude.unwrap_or(config.extrude);

    // Boolean flags: CLI presence sets them to true, otherwise use config
    let opaque = args.opaque || config.opaque;

    // Verbose is CLI-only
    let verbose = args.verbose;

    // Scan step: CLI > config > default
    let scan_step = if let Some(step) = args.scan_step {
        step
    } else {
        parse_scan_step(&config.scan_step).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown scan_step '{}' in config file. Valid values: edge, pixel",
                config.scan_step
            )
        })?
    };

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        config
            .compress
            .as_ref()
            .map(|c| match c {
                CompressConfig::Level(n) if *n <= 6 => Ok(CompressionLevel::Level(*n)),
                CompressConfig::Max(s) if s.eq_ignore_ascii_case("max") => {
                    Ok(CompressionLevel::Max)
                }
                other => Err(anyhow::anyhow!(
                    "invalid compress value {:?} in config file. Valid values: 0-6, \"max\"",
                    other
                )),
            })
            .transpose()?
    };

    Ok(MergedConfig {
        input,
        base_dir,
        file_list,
        output,
        name,
        max_size,
        border,
        extrude,
        scan_step,
        opaque,
        verbose,
        compress,
    })
}

fn parse_scan_step(s: &str) -> Option<ScanStep> {
    match s {
        "edge" => Some(ScanStep::Edge),
        "pixel" => Some(ScanStep::Pixel),
        _ => None,
    }
}
