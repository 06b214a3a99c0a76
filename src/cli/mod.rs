mod args;

pub use args::{CliArgs, Command, CommonArgs, CompressionLevel, ScanStep};
