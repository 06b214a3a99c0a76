use std::borrow::Borrow;

use image::{RgbaImage, imageops};
use log::info;

use super::Atlas;
use crate::cli::ScanStep;
use crate::error::AtlasError;
use crate::packing::{Footprint, MAX_ATLAS_SIZE, Rect, ScanlinePacker, is_supported_size};

/// Configuration for atlas building
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    pub max_size: u32,
    pub border: u32,
    pub extrude: u32,
    pub scan_step: ScanStep,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self {
            max_size: MAX_ATLAS_SIZE,
            border: 1,
            extrude: 0,
            scan_step: ScanStep::Edge,
        }
    }
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn extrude(mut self, extrude: u32) -> Self {
        self.extrude = extrude;
        self
    }

    pub fn scan_step(mut self, scan_step: ScanStep) -> Self {
        self.scan_step = scan_step;
        self
    }

    pub fn validate(&self) -> Result<(), AtlasError> {
        if !is_supported_size(self.max_size) {
            return Err(AtlasError::InvalidSettings(format!(
                "max size {} is not a power of two between 1 and {}",
                self.max_size, MAX_ATLAS_SIZE
            )));
        }
        if self.border > MAX_ATLAS_SIZE {
            return Err(AtlasError::InvalidSettings(format!(
                "border {} is larger than the maximum atlas size",
                self.border
            )));
        }
        if self.extrude > self.border {
            return Err(AtlasError::InvalidSettings(format!(
                "extrude ({}) must not exceed border ({})",
                self.extrude, self.border
            )));
        }
        Ok(())
    }

    /// Pack sprites into a single atlas.
    ///
    /// `rects[i]` of the result describes `sprites[i]`. Either every sprite
    /// is placed or the call fails and no atlas is produced.
    pub fn pack<S: Borrow<RgbaImage>>(&self, sprites: &[S]) -> Result<Atlas, AtlasError> {
        self.validate()?;

        if sprites.is_empty() {
            return Err(AtlasError::EmptyInput);
        }

        let footprints = self.footprints(sprites)?;
        let layout = ScanlinePacker::new(self.max_size, self.scan_step).layout(&footprints)?;

        let rects = layout
            .footprints
            .iter()
            .zip(sprites)
            .map(|(footprint, sprite)| {
                let sprite = sprite.borrow();
                Rect::new(
                    footprint.x + self.border,
                    footprint.y + self.border,
                    sprite.width(),
                    sprite.height(),
                )
            })
            .collect();

        let mut atlas = Atlas::new(layout.width, layout.height, rects);

        for (sprite, rect) in sprites.iter().zip(&atlas.rects) {
            let sprite = sprite.borrow();

            if self.extrude > 0 {
                extrude_edges(&mut atlas.image, sprite, rect.x, rect.y, self.extrude);
            }

            // Straight copy: the background is transparent and sprite alpha
            // must survive unblended
            imageops::replace(
                &mut atlas.image,
                sprite,
                i64::from(rect.x),
                i64::from(rect.y),
            );
        }

        info!(
            "Atlas: {}x{} with {} sprites ({:.1}% efficiency)",
            atlas.width,
            atlas.height,
            atlas.rects.len(),
            atlas.occupancy() * 100.0
        );

        Ok(atlas)
    }

    /// Padded footprint of every sprite; rejects empty images
    fn footprints<S: Borrow<RgbaImage>>(&self, sprites: &[S]) -> Result<Vec<Footprint>, AtlasError> {
        sprites
            .iter()
            .enumerate()
            .map(|(index, sprite)| {
                let (width, height) = sprite.borrow().dimensions();
                if width == 0 || height == 0 {
                    return Err(AtlasError::InvalidSprite {
                        index,
                        width,
                        height,
                    });
                }
                Ok(Footprint::new(
                    index,
                    width.saturating_add(self.border * 2),
                    height.saturating_add(self.border * 2),
                ))
            })
            .collect()
    }
}

/// Pack sprites with the default settings: 1px border, no extrusion, atlas
/// sides up to 4096px.
pub fn pack<S: Borrow<RgbaImage>>(sprites: &[S]) -> Result<Atlas, AtlasError> {
    AtlasBuilder::default().pack(sprites)
}

/// Repeat the sprite's outermost pixels `amount` pixels outward.
///
/// The caller guarantees `amount` does not exceed the border, so every write
/// stays inside the sprite's own footprint.
fn extrude_edges(atlas: &mut RgbaImage, sprite: &RgbaImage, x: u32, y: u32, amount: u32) {
    let (w, h) = sprite.dimensions();
    let right = x + w - 1;
    let bottom = y + h - 1;

    for e in 1..=amount {
        for sx in 0..w {
            atlas.put_pixel(x + sx, y - e, *sprite.get_pixel(sx, 0));
            atlas.put_pixel(x + sx, bottom + e, *sprite.get_pixel(sx, h - 1));
        }
        for sy in 0..h {
            atlas.put_pixel(x - e, y + sy, *sprite.get_pixel(0, sy));
            atlas.put_pixel(right + e, y + sy, *sprite.get_pixel(w - 1, sy));
        }
    }

    // Corner squares take the corner pixel
    for dy in 1..=amount {
        for dx in 1..=amount {
            atlas.put_pixel(x - dx, y - dy, *sprite.get_pixel(0, 0));
            atlas.put_pixel(right + dx, y - dy, *sprite.get_pixel(w - 1, 0));
            atlas.put_pixel(x - dx, bottom + dy, *sprite.get_pixel(0, h - 1));
            atlas.put_pixel(right + dx, bottom + dy, *sprite.get_pixel(w - 1, h - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;
    use image::Rgba;

    const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_single_sprite() {
        let atlas = pack(&[solid(10, 10, [255, 0, 0, 255])]).unwrap();

        assert_eq!(atlas.width, 16);
        assert_eq!(atlas.height, 16);
        assert_eq!(atlas.image.dimensions(), (16, 16));
        assert_eq!(atlas.rects, vec![Rect::new(1, 1, 10, 10)]);
    }

    #[test]
    fn test_three_equal_sprites() {
        let sprites: Vec<_> = (0..3).map(|_| solid(10, 10, [0, 255, 0, 255])).collect();
        let atlas = pack(&sprites).unwrap();

        assert_eq!((atlas.width, atlas.height), (32, 32));
        assert_eq!(
            atlas.rects,
            vec![
                Rect::new(1, 1, 10, 10),
                Rect::new(13, 1, 10, 10),
                Rect::new(1, 13, 10, 10),
            ]
        );
        for (i, a) in atlas.rects.iter().enumerate() {
            for b in &atlas.rects[i + 1..] {
                assert!(!a.expand(1).intersects(&b.expand(1)));
            }
        }
    }

    #[test]
    fn test_wide_sprite_forces_width() {
        let sprites = vec![
            solid(100, 10, [255, 255, 255, 255]),
            solid(4, 4, [255, 255, 255, 255]),
            solid(4, 4, [255, 255, 255, 255]),
        ];
        let atlas = pack(&sprites).unwrap();

        // The estimate alone would give 16px
        assert_eq!(atlas.width, 128);
        assert_eq!(atlas.height, 16);
        assert_eq!(
            atlas.rects,
            vec![
                Rect::new(1, 1, 100, 10),
                Rect::new(103, 1, 4, 4),
                Rect::new(109, 1, 4, 4),
            ]
        );
    }

    #[test]
    fn test_pixels_copied_with_transparent_border() {
        let color = Rgba([12, 34, 56, 255]);
        let atlas = pack(&[RgbaImage::from_pixel(4, 4, color)]).unwrap();
        let rect = atlas.rects[0];

        for y in 0..rect.height {
            for x in 0..rect.width {
                assert_eq!(*atlas.image.get_pixel(rect.x + x, rect.y + y), color);
            }
        }

        let border = rect.expand(1);
        for x in border.x..border.right() {
            assert_eq!(*atlas.image.get_pixel(x, border.y), TRANSPARENT);
            assert_eq!(*atlas.image.get_pixel(x, border.bottom() - 1), TRANSPARENT);
        }
        for y in border.y..border.bottom() {
            assert_eq!(*atlas.image.get_pixel(border.x, y), TRANSPARENT);
            assert_eq!(*atlas.image.get_pixel(border.right() - 1, y), TRANSPARENT);
        }
    }

    #[test]
    fn test_translucent_pixels_are_not_blended() {
        let color = Rgba([200, 100, 50, 128]);
        let atlas = pack(&[RgbaImage::from_pixel(3, 3, color)]).unwrap();
        assert_eq!(*atlas.image.get_pixel(1, 1), color);
    }

    #[test]
    fn test_pack_borrowed_sprites() {
        let a = solid(8, 8, [1, 2, 3, 255]);
        let b = solid(6, 3, [4, 5, 6, 255]);
        let atlas = pack(&[&a, &b]).unwrap();

        assert_eq!(atlas.rects.len(), 2);
        assert_eq!((atlas.rects[0].width, atlas.rects[0].height), (8, 8));
        assert_eq!((atlas.rects[1].width, atlas.rects[1].height), (6, 3));
    }

    #[test]
    fn test_empty_input() {
        let sprites: Vec<RgbaImage> = Vec::new();
        assert!(matches!(pack(&sprites), Err(AtlasError::EmptyInput)));
    }

    #[test]
    fn test_zero_sized_sprite() {
        let sprites = vec![solid(4, 4, [0, 0, 0, 255]), RgbaImage::new(0, 7)];
        let err = pack(&sprites).unwrap_err();
        assert!(matches!(
            err,
            AtlasError::InvalidSprite {
                index: 1,
                width: 0,
                height: 7
            }
        ));
    }

    #[test]
    fn test_sprite_wider_than_max() {
        let err = AtlasBuilder::new()
            .max_size(64)
            .pack(&[RgbaImage::new(63, 1)])
            .unwrap_err();
        assert!(matches!(
            err,
            AtlasError::AtlasTooLarge {
                axis: Axis::Width,
                required: 65,
                max: 64
            }
        ));
    }

    #[test]
    fn test_sprites_taller_than_max() {
        let sprites: Vec<_> = (0..3).map(|_| RgbaImage::new(30, 40)).collect();
        let err = AtlasBuilder::new().max_size(64).pack(&sprites).unwrap_err();
        assert!(matches!(
            err,
            AtlasError::AtlasTooLarge {
                axis: Axis::Height,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_settings() {
        let sprites = vec![RgbaImage::new(4, 4)];

        let err = AtlasBuilder::new().max_size(100).pack(&sprites).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidSettings(_)));

        let err = AtlasBuilder::new().max_size(8192).pack(&sprites).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidSettings(_)));

        let err = AtlasBuilder::new()
            .border(1)
            .extrude(2)
            .pack(&sprites)
            .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidSettings(_)));
    }

    #[test]
    fn test_wider_border() {
        let atlas = AtlasBuilder::new()
            .border(3)
            .pack(&[solid(10, 10, [9, 9, 9, 255])])
            .unwrap();

        assert_eq!(atlas.rects, vec![Rect::new(3, 3, 10, 10)]);
        assert_eq!((atlas.width, atlas.height), (16, 16));
    }

    #[test]
    fn test_extrusion_fills_border() {
        let mut sprite = RgbaImage::new(2, 2);
        let tl = Rgba([255, 0, 0, 255]);
        let tr = Rgba([0, 255, 0, 255]);
        let bl = Rgba([0, 0, 255, 255]);
        let br = Rgba([255, 255, 0, 255]);
        sprite.put_pixel(0, 0, tl);
        sprite.put_pixel(1, 0, tr);
        sprite.put_pixel(0, 1, bl);
        sprite.put_pixel(1, 1, br);

        let atlas = AtlasBuilder::new().extrude(1).pack(&[sprite]).unwrap();
        let image = &atlas.image;

        assert_eq!(atlas.rects, vec![Rect::new(1, 1, 2, 2)]);
        assert_eq!((atlas.width, atlas.height), (4, 4));

        // Corners
        assert_eq!(*image.get_pixel(0, 0), tl);
        assert_eq!(*image.get_pixel(3, 0), tr);
        assert_eq!(*image.get_pixel(0, 3), bl);
        assert_eq!(*image.get_pixel(3, 3), br);
        // Edges
        assert_eq!(*image.get_pixel(1, 0), tl);
        assert_eq!(*image.get_pixel(2, 0), tr);
        assert_eq!(*image.get_pixel(0, 2), bl);
        assert_eq!(*image.get_pixel(3, 1), tr);
        assert_eq!(*image.get_pixel(2, 3), br);
        // Interior untouched
        assert_eq!(*image.get_pixel(1, 1), tl);
        assert_eq!(*image.get_pixel(2, 2), br);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let sprites: Vec<_> = [(13, 7), (5, 22), (9, 9), (31, 4), (6, 6), (17, 12)]
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let shade = u8::try_from(i * 40).unwrap();
                solid(w, h, [shade, 255 - shade, 7, 255])
            })
            .collect();

        let first = pack(&sprites).unwrap();
        let second = pack(&sprites).unwrap();

        assert_eq!(first.rects, second.rects);
        assert_eq!(first.image.as_raw(), second.image.as_raw());
    }
}
