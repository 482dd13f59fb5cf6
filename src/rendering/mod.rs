//! Rendering pipeline: slide block -> layout -> display list -> raster.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::config::{Rgb, DEFAULT_CAPTURE_SCALE};
use crate::pdf::Orientation;
use crate::surface::SlideBlock;
use crate::Result;
use sha2::{Digest, Sha256};

/// A rasterized slide block, PNG encoded
#[derive(Debug, Clone)]
pub struct Capture {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Capture {
    pub fn orientation(&self) -> Orientation {
        Orientation::for_dimensions(self.width as f64, self.height as f64)
    }

    /// Hex SHA-256 of the PNG bytes, stable for identical renders
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel
    pub scale: u32,
    /// Colour under everything the block paints
    pub background: Rgb,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_CAPTURE_SCALE,
            background: Rgb::WHITE,
        }
    }
}

/// Render one slide block to a PNG capture. CPU bound; call from a blocking
/// context when on an async runtime.
pub fn capture_block(block: &SlideBlock, options: &CaptureOptions) -> Result<Capture> {
    let layout = layout::layout_block(block);
    let commands = paint::build_display_list(&layout);
    log::debug!(
        "capturing slide block {} ({}x{} css px, {} paint commands, scale {})",
        block.index + 1,
        layout.width,
        layout.height,
        commands.len(),
        options.scale
    );
    raster::rasterize(
        &commands,
        layout.width,
        layout.height,
        options.scale,
        options.background,
    )
}
