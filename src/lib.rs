//! # DMG Background Generator
//!
//! Renders the background image shown in the Finder window of the installer
//! disk image and encodes it as a PNG by hand.
//!
//! This library is organized into several modules:
//! - `utils`: Error handling
//! - `png`: PNG chunk framing, CRC-32, `IHDR`, scanlines and the encoder
//! - `render`: The RGBA canvas and the background/arrow drawing

// Re-export commonly used types at the crate root
pub use utils::error::{DmgError, Result};

pub mod utils {
    pub mod error;
}

pub mod png {
    pub mod chunk;
    pub mod crc;
    pub mod encoder;
    pub mod header;
    pub mod scanline;

    pub use chunk::{ChunkType, PNG_SIGNATURE, PngReader, PngWriter, RawChunk};
    pub use encoder::{PngEncodeParams, encode_rgba, write_file, write_png};
    pub use header::{ColorType, ImageHeader};
}

pub mod render {
    pub mod background;
    pub mod canvas;

    pub use background::{BackgroundParams, Scale, generate, is_arrow_pixel, render_background};
    pub use canvas::{Rgba, RgbaCanvas};
}

// Public API exports
pub use png::{PngEncodeParams, encode_rgba, write_file, write_png};
pub use render::{BackgroundParams, Scale, generate};

/// Where the build pipeline expects the background, relative to the project root.
pub const DEFAULT_OUTPUT: &str = "build/dmg-background.png";

/// Installs an `env_logger` logger reading `RUST_LOG`, defaulting to `info`.
///
/// Calling this more than once is harmless; only the first call installs a logger.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}
