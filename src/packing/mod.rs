mod rect;
mod scanline;
mod sizes;

pub use rect::Rect;
pub use scanline::{Footprint, Layout, ScanlinePacker, estimate_width, placement_order};
pub use sizes::{MAX_ATLAS_SIZE, SUPPORTED_SIZES, fit_size, is_supported_size};
