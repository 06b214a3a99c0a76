mod binary;
mod format;
mod json;

pub use binary::write_binary;
pub use format::save_atlas_image;
pub use json::write_json;
