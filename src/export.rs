//! Export routine: captures every rendered slide block and saves them as one
//! paginated document.
//!
//! The routine is single-flight. It reads the mounted surface, never the
//! slide store, so the page count always matches the number of blocks that
//! were rendered when the export was requested. Any failure aborts the whole
//! export: nothing is saved, the cause is logged, and the view shows
//! [`EXPORT_FAILURE_MESSAGE`].

use crate::capture::{Capturer, RasterCapturer};
use crate::config::ExportConfig;
use crate::pdf::{Orientation, PageFormat, PdfDocument, PdfOptions};
use crate::rendering::raster::glyph;
use crate::rendering::{Capture, CaptureOptions};
use crate::surface::Surface;
use crate::view::{ViewState, EXPORT_FAILURE_MESSAGE};
use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;

/// The two capabilities an export needs, loaded once on first use
#[derive(Clone)]
pub struct Capabilities {
    pub capturer: Arc<dyn Capturer>,
    pub pdf: PdfOptions,
}

/// Lazily provides [`Capabilities`]. A failed load is not cached, so the next
/// export tries again.
pub trait CapabilityLoader: Send + Sync {
    fn load(&self) -> BoxFuture<'_, Result<Capabilities>>;
}

/// Loads the raster capturer and the PDF writer settings
#[derive(Debug, Clone)]
pub struct BuiltinCapabilities {
    pdf: PdfOptions,
}

impl BuiltinCapabilities {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            pdf: PdfOptions {
                title: config.document_title.clone(),
                ..PdfOptions::default()
            },
        }
    }
}

impl CapabilityLoader for BuiltinCapabilities {
    fn load(&self) -> BoxFuture<'_, Result<Capabilities>> {
        async move {
            if glyph('A').is_none() {
                return Err(Error::CapabilityLoad("cell font has no Latin glyphs".into()));
            }
            log::debug!("export capabilities loaded");
            Ok(Capabilities {
                capturer: Arc::new(RasterCapturer::new()),
                pdf: self.pdf.clone(),
            })
        }
        .boxed()
    }
}

/// Destination for a finished document
pub trait DocumentSink: Send + Sync {
    /// Persist `bytes` under `file_name`, returning where it went
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves documents into a directory, creating it if needed.
///
/// The file is written under a temporary name and renamed into place, so a
/// reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if file_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::SaveError(format!("'{}' is not a plain file name", file_name)));
        }
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::SaveError(format!("Can't create {}: {}", self.dir.display(), e)))?;
        let path = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{}.part", file_name));
        std::fs::write(&partial, bytes)
            .map_err(|e| Error::SaveError(format!("Can't write {}: {}", partial.display(), e)))?;
        std::fs::rename(&partial, &path).map_err(|e| {
            let _ = std::fs::remove_file(&partial);
            Error::SaveError(format!("Can't move document to {}: {}", path.display(), e))
        })?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Keeps saved documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<SavedDocument>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<SavedDocument> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl DocumentSink for MemorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SavedDocument {
                file_name: file_name.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(PathBuf::from(file_name))
    }
}

/// Size and orientation of one exported page, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub file_name: String,
    pub location: PathBuf,
    pub pages: Vec<PageInfo>,
    pub size_bytes: usize,
}

#[derive(Debug)]
pub enum ExportOutcome {
    /// Every block was captured and the document saved
    Saved(ExportReport),
    /// Nothing mounted, or an export was already running
    Skipped,
    /// The export failed as a whole; the view shows the generic notice
    Failed(Error),
}

impl ExportOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ExportOutcome::Saved(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ExportOutcome::Skipped)
    }

    pub fn report(&self) -> Option<&ExportReport> {
        match self {
            ExportOutcome::Saved(report) => Some(report),
            _ => None,
        }
    }
}

/// Clears the busy flag however the export ends
struct BusyGuard<'a>(&'a ViewState);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_export();
    }
}

pub struct Exporter {
    config: ExportConfig,
    loader: Arc<dyn CapabilityLoader>,
    sink: Arc<dyn DocumentSink>,
    capabilities: OnceCell<Capabilities>,
}

impl Exporter {
    pub fn new(config: ExportConfig, loader: Arc<dyn CapabilityLoader>, sink: Arc<dyn DocumentSink>) -> Self {
        Self {
            config,
            loader,
            sink,
            capabilities: OnceCell::new(),
        }
    }

    /// Built-in capabilities, saving into `config.output_dir`
    pub fn with_defaults(config: ExportConfig) -> Self {
        let loader = Arc::new(BuiltinCapabilities::from_config(&config));
        let sink = Arc::new(DirectorySink::new(config.output_dir.clone()));
        Self::new(config, loader, sink)
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Capture every slide block on `surface` and save one document.
    ///
    /// Returns `Skipped` without touching the view when nothing is mounted or
    /// another export holds the busy flag.
    pub async fn export_to_document(&self, view: &ViewState, surface: Option<&Surface>) -> ExportOutcome {
        let Some(surface) = surface else {
            log::debug!("export requested with no mounted surface");
            return ExportOutcome::Skipped;
        };
        if !view.try_begin_export() {
            log::warn!("export already in progress; request dropped");
            return ExportOutcome::Skipped;
        }
        let _busy = BusyGuard(view);
        view.clear_error();

        match self.run(surface).await {
            Ok(report) => {
                log::info!(
                    "saved {} ({} pages, {} bytes)",
                    report.location.display(),
                    report.pages.len(),
                    report.size_bytes
                );
                ExportOutcome::Saved(report)
            }
            Err(err) => {
                log::error!("PDF export failed: {}", err);
                view.set_error(EXPORT_FAILURE_MESSAGE);
                ExportOutcome::Failed(err)
            }
        }
    }

    async fn run(&self, surface: &Surface) -> Result<ExportReport> {
        let caps = self
            .capabilities
            .get_or_try_init(|| self.loader.load())
            .await?;

        let blocks = surface.slide_blocks()?;
        if blocks.is_empty() {
            return Err(Error::SlidesNotFound);
        }

        let options = CaptureOptions {
            scale: self.config.scale,
            background: self.config.background,
        };
        let mut pdf: Option<PdfDocument> = None;
        let mut pages = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let capture = self.bounded(caps.capturer.capture(block, &options)).await?;
            log::debug!(
                "captured slide {} of {}: {}x{} sha256={}",
                index + 1,
                blocks.len(),
                capture.width,
                capture.height,
                capture.digest()
            );
            let orientation = capture.orientation();
            let format = PageFormat::new(capture.width as f64, capture.height as f64);

            match pdf.as_mut() {
                Some(doc) => {
                    doc.add_page(format, orientation);
                    doc.set_page(index + 1)?;
                }
                None => pdf = Some(PdfDocument::new(format, orientation, caps.pdf.clone())),
            }
            let doc = pdf
                .as_mut()
                .ok_or_else(|| Error::DocumentError("document was not created".into()))?;
            let page = doc.page_size();
            doc.add_image_png(&capture.png_data, 0.0, 0.0, page.width, page.height)?;
            pages.push(page_info(&capture));
        }

        let doc = pdf.ok_or(Error::SlidesNotFound)?;
        let bytes = doc.to_bytes()?;
        let location = self.sink.save(&self.config.file_name, &bytes)?;
        Ok(ExportReport {
            file_name: self.config.file_name.clone(),
            location,
            pages,
            size_bytes: bytes.len(),
        })
    }

    async fn bounded(&self, capture: BoxFuture<'_, Result<Capture>>) -> Result<Capture> {
        match self.config.capture_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), capture)
                .await
                .map_err(|_| Error::Timeout(ms))?,
            None => capture.await,
        }
    }
}

fn page_info(capture: &Capture) -> PageInfo {
    PageInfo {
        width: capture.width,
        height: capture.height,
        orientation: capture.orientation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use crate::slides::{DECK, SLIDES};
    use crate::view::{render_page, ViewSnapshot};

    fn surface() -> Surface {
        let mut s = Surface::new(Viewport::default());
        s.load_html(render_page(&DECK, &SLIDES[..2], &ViewSnapshot::default()).unwrap());
        s
    }

    fn exporter(sink: Arc<MemorySink>) -> Exporter {
        let config = ExportConfig::default();
        let loader = Arc::new(BuiltinCapabilities::from_config(&config));
        Exporter::new(config, loader, sink)
    }

    #[tokio::test]
    async fn exports_one_page_per_block() {
        let sink = Arc::new(MemorySink::new());
        let view = ViewState::new();
        let outcome = exporter(sink.clone()).export_to_document(&view, Some(&surface())).await;
        let report = outcome.report().expect("saved").clone();
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.file_name, crate::config::DEFAULT_FILE_NAME);
        assert!(!view.is_busy());
        assert!(view.error_message().is_none());
        let docs = sink.documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].bytes.len(), report.size_bytes);
    }

    #[tokio::test]
    async fn missing_surface_is_skipped() {
        let sink = Arc::new(MemorySink::new());
        let view = ViewState::new();
        let outcome = exporter(sink.clone()).export_to_document(&view, None).await;
        assert!(outcome.is_skipped());
        assert!(sink.documents().is_empty());
    }

    #[tokio::test]
    async fn busy_view_is_skipped() {
        let sink = Arc::new(MemorySink::new());
        let view = ViewState::new();
        assert!(view.try_begin_export());
        let outcome = exporter(sink.clone()).export_to_document(&view, Some(&surface())).await;
        assert!(outcome.is_skipped());
        // the holder of the flag still owns it
        assert!(view.is_busy());
    }

    #[test]
    fn directory_sink_writes_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));
        let path = sink.save("deck.pdf", b"%PDF-1.4").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert!(!dir.path().join("out/.deck.pdf.part").exists());
        assert!(sink.save("../escape.pdf", b"x").is_err());
    }
}
