use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::atlas::Atlas;
use crate::error::AtlasError;
use crate::sprite::SourceSprite;

/// Revision of the binary atlas table layout
const TABLE_VERSION: u16 = 1;

/// Write the binary atlas table (`<name>.atlas`) and the sprite id list
/// (`<name>.atlasid`).
///
/// Table layout, all little-endian u16: sprite count, table version, atlas
/// width, atlas height, then per sprite in index order: x, y, width, height,
/// offset x, offset y, source width, source height. Sprites are packed
/// untrimmed, so offsets are zero and the source size equals the frame size.
pub fn write_binary(
    atlas: &Atlas,
    sprites: &[SourceSprite],
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let table = encode_table(atlas)?;
    let table_path = output_dir.join(format!("{}.atlas", base_name));
    fs::write(&table_path, table).map_err(|e| AtlasError::OutputWrite {
        path: table_path,
        source: e,
    })?;

    let ids_path = output_dir.join(format!("{}.atlasid", base_name));
    fs::write(&ids_path, encode_ids(sprites)).map_err(|e| AtlasError::OutputWrite {
        path: ids_path,
        source: e,
    })?;

    Ok(())
}

fn encode_table(atlas: &Atlas) -> Result<Vec<u8>, AtlasError> {
    let count = u16::try_from(atlas.rects.len()).map_err(|_e| AtlasError::TooManySprites {
        count: atlas.rects.len(),
        max: usize::from(u16::MAX),
    })?;

    let mut out = Vec::with_capacity(8 + atlas.rects.len() * 16);
    put_u16(&mut out, count);
    put_u16(&mut out, TABLE_VERSION);
    put_u16(&mut out, to_u16(atlas.width)?);
    put_u16(&mut out, to_u16(atlas.height)?);

    for rect in &atlas.rects {
        let x = to_u16(rect.x)?;
        let y = to_u16(rect.y)?;
        let w = to_u16(rect.width)?;
        let h = to_u16(rect.height)?;
        for value in [x, y, w, h, 0, 0, w, h] {
            put_u16(&mut out, value);
        }
    }

    Ok(out)
}

fn encode_ids(sprites: &[SourceSprite]) -> String {
    sprites.iter().fold(String::new(), |mut ids, sprite| {
        ids.push_str(&sprite.name);
        ids.push('\n');
        ids
    })
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Atlas coordinates never exceed 4096, so this only fails on corrupt input
fn to_u16(value: u32) -> Result<u16, AtlasError> {
    u16::try_from(value).map_err(|_e| AtlasError::TableOverflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Rect;
    use image::RgbaImage;
    use std::path::PathBuf;

    fn read_u16s(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    #[test]
    fn test_encode_table() {
        let atlas = Atlas::new(
            32,
            16,
            vec![Rect::new(1, 1, 10, 10), Rect::new(13, 1, 4, 7)],
        );

        let bytes = encode_table(&atlas).unwrap();
        assert_eq!(bytes.len(), 8 + 2 * 16);
        assert_eq!(
            read_u16s(&bytes),
            vec![
                2, 1, 32, 16, //
                1, 1, 10, 10, 0, 0, 10, 10, //
                13, 1, 4, 7, 0, 0, 4, 7,
            ]
        );
    }

    #[test]
    fn test_table_is_little_endian() {
        let atlas = Atlas::new(4096, 1, vec![Rect::new(258, 0, 1, 1)]);
        let bytes = encode_table(&atlas).unwrap();
        assert_eq!(&bytes[4..6], &[0x00, 0x10]);
        assert_eq!(&bytes[8..10], &[0x02, 0x01]);
    }

    #[test]
    fn test_too_many_sprites() {
        let rects = vec![Rect::new(1, 1, 1, 1); usize::from(u16::MAX) + 1];
        let atlas = Atlas {
            width: 1,
            height: 1,
            image: RgbaImage::new(1, 1),
            rects,
        };
        assert!(matches!(
            encode_table(&atlas),
            Err(AtlasError::TooManySprites { count: 65536, .. })
        ));
    }

    #[test]
    fn test_encode_ids() {
        let sprites: Vec<_> = ["0041.png", "ui/button.png"]
            .iter()
            .map(|name| SourceSprite {
                path: PathBuf::from(name),
                name: name.to_string(),
                image: RgbaImage::new(1, 1),
            })
            .collect();

        assert_eq!(encode_ids(&sprites), "0041.png\nui/button.png\n");
    }
}
