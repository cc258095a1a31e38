//! Displayable frames and the destinations they are presented to.

use crate::renderer::pixel_index;

/// An 8-bit RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Frame {
    /// Create a frame from row-major pixels.
    ///
    /// `pixels.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[pixel_index(self.width, x, y) as usize]
    }

    /// Flattened RGB bytes, 3 per pixel.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Destination for rendered frames.
///
/// The renderer presents a frame after every progressive pass; a sink
/// decides what to do with it (write a file, update a window, keep it).
pub trait DisplaySink {
    type Error;

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Keeps every presented frame.
impl DisplaySink for Vec<Frame> {
    type Error = std::convert::Infallible;

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        self.push(frame.clone());
        Ok(())
    }
}
