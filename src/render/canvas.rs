// src/render/canvas.rs

//! An owned RGBA8 pixel grid.

use bytemuck::{Pod, Zeroable};

/// One 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }

    /// Same colour, fully opaque.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }
}

/// A row-major RGBA canvas with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RgbaCanvas {
    /// Creates a canvas filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        RgbaCanvas {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Sets one pixel. Coordinates outside the canvas are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// The pixels as a flat `r, g, b, a, r, g, b, a, ...` byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Rgba> {
        self.pixels.chunks_exact_mut(self.width.max(1) as usize)
    }

    /// Row-parallel counterpart of [`rows_mut`](Self::rows_mut).
    #[cfg(feature = "rayon")]
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, Rgba> {
        use rayon::prelude::*;
        self.pixels.par_chunks_exact_mut(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_bytes() {
        let canvas = RgbaCanvas::new(2, 1, Rgba::new(1, 2, 3, 4));
        assert_eq!(canvas.as_bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_put_get() {
        let mut canvas = RgbaCanvas::new(3, 2, Rgba::default());
        canvas.put(2, 1, Rgba::opaque(9, 8, 7));
        assert_eq!(canvas.get(2, 1), Some(Rgba([9, 8, 7, 255])));
        assert_eq!(canvas.get(0, 0), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(canvas.get(3, 0), None);

        // Out of bounds writes are dropped.
        canvas.put(5, 5, Rgba::opaque(1, 1, 1));
        assert_eq!(&canvas.as_bytes()[20..24], &[9, 8, 7, 255]);
    }

    #[test]
    fn test_rows_mut() {
        let mut canvas = RgbaCanvas::new(2, 3, Rgba::default());
        for (y, row) in canvas.rows_mut().enumerate() {
            assert_eq!(row.len(), 2);
            row[0] = Rgba::opaque(y as u8, 0, 0);
        }
        assert_eq!(canvas.get(0, 2), Some(Rgba::opaque(2, 0, 0)));
        assert_eq!(canvas.get(1, 2), Some(Rgba::default()));
    }
}
