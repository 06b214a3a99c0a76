use image::RgbaImage;

use crate::packing::Rect;

/// A packed texture atlas
#[derive(Debug, Clone)]
pub struct Atlas {
    /// Atlas width, always a supported power of two
    pub width: u32,
    /// Atlas height, always a supported power of two
    pub height: u32,
    /// Rendered atlas image
    pub image: RgbaImage,
    /// Interior rectangle of every sprite, in input order
    pub rects: Vec<Rect>,
}

impl Atlas {
    pub fn new(width: u32, height: u32, rects: Vec<Rect>) -> Self {
        Self {
            width,
            height,
            image: RgbaImage::new(width, height),
            rects,
        }
    }

    /// Share of the atlas covered by sprite pixels (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.width) * u64::from(self.height);
        if total_area == 0 {
            return 0.0;
        }
        let used_area: u64 = self.rects.iter().map(Rect::area).sum();
        used_area as f64 / total_area as f64
    }
}
