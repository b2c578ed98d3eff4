// src/render/background.rs

//! The DMG window background: a flat light fill with a grey arrow pointing
//! from the app icon towards the Applications folder.

use crate::png::encoder::{PngEncodeParams, encode_rgba};
use crate::render::canvas::{Rgba, RgbaCanvas};
use crate::utils::error::{DmgError, Result};
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

/// Logical (1x) window size in points.
pub const BASE_WIDTH: u32 = 660;
pub const BASE_HEIGHT: u32 = 400;

pub const BACKGROUND_COLOR: Rgba = Rgba::new(245, 245, 247, 255);
pub const ARROW_COLOR: Rgba = Rgba::new(160, 160, 165, 255);

// Arrow geometry in pixels, relative to the arrow centre.
const CENTER_RAISE: i64 = 10;
const SHAFT_HALF_THICKNESS: i64 = 3;
const SHAFT_BACK: i64 = 30;
const SHAFT_FRONT: i64 = 20;
const HEAD_LENGTH: i64 = 20;

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    /// 660 x 400
    Standard,
    /// 1320 x 800, for HiDPI displays
    #[default]
    Retina,
}

impl Scale {
    #[inline]
    pub const fn factor(self) -> u32 {
        match self {
            Scale::Standard => 1,
            Scale::Retina => 2,
        }
    }
}

impl FromStr for Scale {
    type Err = DmgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "1x" => Ok(Scale::Standard),
            "2" | "2x" => Ok(Scale::Retina),
            other => Err(DmgError::InvalidArg(format!(
                "Unsupported scale '{}': expected 1 or 2",
                other
            ))),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

/// Configuration for rendering the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundParams {
    pub scale: Scale,
    pub background: Rgba,
    /// Alpha is ignored; arrow pixels keep the background's alpha.
    pub arrow: Rgba,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            background: BACKGROUND_COLOR,
            arrow: ARROW_COLOR,
        }
    }
}

impl BackgroundParams {
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Pixel dimensions of the rendered image.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        let k = self.scale.factor();
        (BASE_WIDTH * k, BASE_HEIGHT * k)
    }
}

/// Returns `true` if `(x, y)` lies on the arrow of a `width x height` image.
///
/// The offsets are fixed pixel counts, so the arrow does not grow with the
/// scale factor.
pub fn is_arrow_pixel(x: u32, y: u32, width: u32, height: u32) -> bool {
    let (x, y) = (x as i64, y as i64);
    let cx = (width / 2) as i64;
    let cy = (height / 2) as i64 - CENTER_RAISE;

    let in_shaft = (cy - SHAFT_HALF_THICKNESS..=cy + SHAFT_HALF_THICKNESS).contains(&y)
        && (cx - SHAFT_BACK..=cx + SHAFT_FRONT).contains(&x);

    let dx = x - (cx + SHAFT_FRONT);
    let dy = (y - cy).abs();
    let in_head = (0..=HEAD_LENGTH).contains(&dx) && dy <= HEAD_LENGTH - dx;

    in_shaft || in_head
}

fn paint_row(row: &mut [Rgba], y: u32, width: u32, height: u32, params: &BackgroundParams) {
    let [r, g, b, _] = params.arrow.0;
    for (x, px) in row.iter_mut().enumerate() {
        *px = params.background;
        if is_arrow_pixel(x as u32, y, width, height) {
            px.0[..3].copy_from_slice(&[r, g, b]);
        }
    }
}

/// Renders the background into a fresh canvas.
pub fn render_background(params: &BackgroundParams) -> RgbaCanvas {
    let (width, height) = params.dimensions();
    let mut canvas = RgbaCanvas::new(width, height, params.background);

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        canvas
            .par_rows_mut()
            .enumerate()
            .for_each(|(y, row)| paint_row(row, y as u32, width, height, params));
    }
    #[cfg(not(feature = "rayon"))]
    for (y, row) in canvas.rows_mut().enumerate() {
        paint_row(row, y as u32, width, height, params);
    }

    debug!("Rendered {}x{} background at {}", width, height, params.scale);
    canvas
}

/// Renders the background and encodes it as PNG bytes.
pub fn generate(params: &BackgroundParams, encode: &PngEncodeParams) -> Result<Vec<u8>> {
    let canvas = render_background(params);
    let (width, height) = canvas.dimensions();
    let png = encode_rgba(canvas.as_bytes(), width, height, encode)?;
    info!(
        "Generated {}x{} DMG background ({} bytes)",
        width,
        height,
        png.len()
    );
    Ok(png)
}
