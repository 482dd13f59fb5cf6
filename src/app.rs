//! Application shell: the slide page, its view state and the export action.

use crate::config::Config;
use crate::export::{ExportOutcome, Exporter};
use crate::slides::{Slide, DECK};
use crate::surface::Surface;
use crate::view::{render_page, ViewSnapshot, ViewState};
use crate::Result;
use std::sync::{Arc, Mutex, PoisonError};

pub struct App {
    config: Config,
    slides: &'static [Slide],
    view: Arc<ViewState>,
    surface: Mutex<Option<Surface>>,
    exporter: Exporter,
}

impl App {
    pub fn new(config: Config, slides: &'static [Slide], exporter: Exporter) -> Self {
        Self {
            config,
            slides,
            view: Arc::new(ViewState::new()),
            surface: Mutex::new(None),
            exporter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn slides(&self) -> &'static [Slide] {
        self.slides
    }

    /// Shared handle to the busy flag and inline error
    pub fn view(&self) -> Arc<ViewState> {
        self.view.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.view.snapshot()
    }

    /// Render the page for the current view state
    pub fn render(&self) -> Result<String> {
        render_page(&DECK, self.slides, &self.view.snapshot())
    }

    /// Render and mount the page, replacing any previous mount
    pub fn mount(&self) -> Result<()> {
        let mut surface = Surface::new(self.config.viewport);
        surface.load_html(self.render()?);
        *self.surface.lock().unwrap_or_else(PoisonError::into_inner) = Some(surface);
        Ok(())
    }

    pub fn unmount(&self) {
        *self.surface.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Copy of the mounted surface, if any
    pub fn surface(&self) -> Option<Surface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The "Download PDF" action.
    ///
    /// Exports whatever is mounted at the moment of the call, then re-mounts
    /// so the page reflects the final busy/error state.
    pub async fn download(&self) -> ExportOutcome {
        let surface = self.surface();
        let outcome = self.exporter.export_to_document(&self.view, surface.as_ref()).await;
        if !outcome.is_skipped() && self.is_mounted() {
            if let Err(err) = self.mount() {
                log::error!("re-mounting the page failed: {}", err);
            }
        }
        outcome
    }
}
