use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::atlas::Atlas;
use crate::error::AtlasError;
use crate::packing::Rect;
use crate::sprite::SourceSprite;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    image: String,
    size: Size,
    sprites: Vec<JsonSprite>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonSprite {
    index: usize,
    name: String,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write JSON metadata file
pub fn write_json(
    atlas: &Atlas,
    sprites: &[SourceSprite],
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let output = build_output(atlas, sprites, base_name);

    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&output)?;

    fs::write(&json_path, content).map_err(|e| AtlasError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn build_output(atlas: &Atlas, sprites: &[SourceSprite], base_name: &str) -> JsonOutput {
    JsonOutput {
        meta: Meta {
            app: "scanpack",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        image: format!("{}.png", base_name),
        size: Size {
            w: atlas.width,
            h: atlas.height,
        },
        sprites: sprites
            .iter()
            .zip(&atlas.rects)
            .enumerate()
            .map(|(index, (sprite, rect))| sprite_to_json(index, sprite, rect))
            .collect(),
    }
}

fn sprite_to_json(index: usize, sprite: &SourceSprite, rect: &Rect) -> JsonSprite {
    JsonSprite {
        index,
        name: sprite.name.clone(),
        frame: Frame {
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
        },
    }
}
