use log::debug;

use super::{Rect, fit_size};
use crate::cli::ScanStep;
use crate::error::{AtlasError, Axis};

/// Weight of the height term in the ordering key.
///
/// The key only orders correctly while padded widths stay below this value;
/// wider sprites can sort ahead of taller ones.
const SIZE_KEY_STRIDE: u64 = 1024;

/// Padded footprint of one input sprite, before placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    /// Position of the sprite in the caller's input
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
        }
    }

    /// Ordering key favouring tall sprites, then wide ones
    pub fn size_key(&self) -> u64 {
        u64::from(self.height) * SIZE_KEY_STRIDE + u64::from(self.width)
    }
}

/// Result of laying out a set of footprints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Placed footprint rectangles, in input index order
    pub footprints: Vec<Rect>,
}

/// Greedy scanline packer.
///
/// Footprints are placed largest-key first. Each one starts at the origin and
/// slides right past the first placed rectangle it collides with, wrapping to
/// a lower row when it runs off the atlas width. The width is fixed up front;
/// the height grows in power-of-two steps as rows fill.
pub struct ScanlinePacker {
    max_size: u32,
    step: ScanStep,
}

impl ScanlinePacker {
    pub fn new(max_size: u32, step: ScanStep) -> Self {
        Self { max_size, step }
    }

    pub fn layout(&self, footprints: &[Footprint]) -> Result<Layout, AtlasError> {
        let estimate = estimate_width(footprints).ok_or(AtlasError::EmptyInput)?;
        let width = fit_size(estimate, self.max_size).ok_or(AtlasError::AtlasTooLarge {
            axis: Axis::Width,
            required: estimate,
            max: self.max_size,
        })?;

        debug!(
            "Estimated atlas width {}px for {} sprites (using {}px)",
            estimate,
            footprints.len(),
            width
        );

        let order = placement_order(footprints);
        let mut placed: Vec<Rect> = Vec::with_capacity(order.len());
        let mut used_height = 0u32;
        let mut height = 0u32;

        for footprint in &order {
            let rect = self.place(footprint, width, &placed)?;

            used_height = used_height.max(rect.bottom());
            height = fit_size(used_height, self.max_size).ok_or(AtlasError::AtlasTooLarge {
                axis: Axis::Height,
                required: used_height,
                max: self.max_size,
            })?;

            debug!(
                "Placed sprite {} ({}x{}) at ({}, {}), atlas now {}x{}",
                footprint.index, rect.width, rect.height, rect.x, rect.y, width, height
            );

            placed.push(rect);
        }

        // Back to the caller's ordering
        let mut resolved: Vec<(usize, Rect)> = order
            .iter()
            .map(|footprint| footprint.index)
            .zip(placed)
            .collect();
        resolved.sort_by_key(|&(index, _)| index);

        Ok(Layout {
            width,
            height,
            footprints: resolved.into_iter().map(|(_, rect)| rect).collect(),
        })
    }

    /// Find the first free position for `footprint`, scanning rows top-down
    fn place(&self, footprint: &Footprint, width: u32, placed: &[Rect]) -> Result<Rect, AtlasError> {
        let mut x = 0u32;
        let mut y = 0u32;

        loop {
            // Anything placed from here on would overflow the tallest atlas
            let bottom = y.saturating_add(footprint.height);
            if bottom > self.max_size {
                return Err(AtlasError::AtlasTooLarge {
                    axis: Axis::Height,
                    required: bottom,
                    max: self.max_size,
                });
            }

            let probe = Rect::new(x, y, footprint.width, footprint.height);
            let Some(blocker) = placed.iter().find(|rect| rect.intersects(&probe)) else {
                return Ok(probe);
            };

            x = blocker.right();
            if x + footprint.width > width {
                x = 0;
                y = match self.step {
                    ScanStep::Pixel => y + 1,
                    ScanStep::Edge => next_open_row(placed, y, footprint.height),
                };
            }
        }
    }
}

/// Candidates sorted by descending size key; ties keep input order
pub fn placement_order(footprints: &[Footprint]) -> Vec<Footprint> {
    let mut order = footprints.to_vec();
    order.sort_by(|a, b| b.size_key().cmp(&a.size_key())); // descending
    order
}

/// Initial atlas width: a square grid of median-width sprites, but never
/// narrower than the widest sprite. `None` for an empty input.
pub fn estimate_width(footprints: &[Footprint]) -> Option<u32> {
    let mut widths: Vec<u32> = footprints.iter().map(|f| f.width).collect();
    widths.sort_unstable();

    let max_width = *widths.last()?;
    let median_width = widths[widths.len() / 2];

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "a non-negative rounded product; oversize values saturate and fail the size lookup"
    )]
    let candidate = (f64::from(median_width) * (widths.len() as f64).sqrt()).round() as u32;

    Some(candidate.max(max_width))
}

/// First row below `y` at which the row band `[y, y + height)` loses one of
/// its current blockers.
///
/// Every rectangle overlapping the band at `y` still overlaps it at every row
/// before its bottom edge, so no row in between can have a free slot that `y`
/// lacked.
fn next_open_row(placed: &[Rect], y: u32, height: u32) -> u32 {
    let band_bottom = y + height;
    placed
        .iter()
        .filter(|rect| rect.y < band_bottom && rect.bottom() > y)
        .map(Rect::bottom)
        .min()
        .unwrap_or(y + 1)
}
