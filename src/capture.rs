//! Block-to-raster capture capability.

use crate::rendering::{capture_block, Capture, CaptureOptions};
use crate::surface::SlideBlock;
use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Anything that can turn a rendered slide block into a raster capture.
///
/// Captures are awaited one at a time by the export routine.
pub trait Capturer: Send + Sync {
    fn capture<'a>(&'a self, block: &'a SlideBlock, options: &'a CaptureOptions) -> BoxFuture<'a, Result<Capture>>;
}

/// The built-in capturer: lays the block out and rasterizes it on tokio's
/// blocking pool.
#[derive(Debug, Clone, Default)]
pub struct RasterCapturer;

impl RasterCapturer {
    pub fn new() -> Self {
        RasterCapturer
    }
}

impl Capturer for RasterCapturer {
    fn capture<'a>(&'a self, block: &'a SlideBlock, options: &'a CaptureOptions) -> BoxFuture<'a, Result<Capture>> {
        let block = block.clone();
        let options = *options;
        async move {
            tokio::task::spawn_blocking(move || capture_block(&block, &options))
                .await
                .map_err(|e| Error::RenderError(format!("Capture worker failed: {}", e)))?
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BlockItem, ItemRole};

    #[tokio::test]
    async fn raster_capturer_runs_off_thread() {
        let block = SlideBlock {
            index: 2,
            label_id: None,
            heading: "H".into(),
            width: 480,
            items: vec![BlockItem { role: ItemRole::Heading, text: "H".into() }],
        };
        let options = CaptureOptions { scale: 1, ..Default::default() };
        let capture = RasterCapturer::new().capture(&block, &options).await.unwrap();
        assert_eq!(capture.width, 480);
        assert!(capture.height > 0);
    }
}
