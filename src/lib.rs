//! slidepress
//!
//! Renders a fixed deck of presentation slides on a headless surface and
//! exports the rendered slides as a multi-page PDF, one page per slide, each
//! page sized to its slide's capture.
//!
//! # Pipeline
//!
//! - **Slide store** ([`slides`]): the static deck
//! - **View** ([`view`]): page markup plus the busy flag and inline error
//! - **Surface** ([`surface`]): the mounted page, queried for slide blocks
//! - **Capture** ([`capture`], [`rendering`]): block -> layout -> raster -> PNG
//! - **Document** ([`pdf`]): PNG pages -> paginated PDF
//! - **Export** ([`export`]): the single-flight routine tying it together
//!
//! # Example
//!
//! ```no_run
//! use slidepress::{Config, ExportOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = slidepress::new_app(Config::default())?;
//! match app.download().await {
//!     ExportOutcome::Saved(report) => println!("saved {}", report.location.display()),
//!     ExportOutcome::Skipped => println!("export already running"),
//!     ExportOutcome::Failed(_) => eprintln!("{}", app.snapshot().error.unwrap_or_default()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod accessibility;
pub mod app;
pub mod capture;
pub mod config;
pub mod export;
pub mod pdf;
pub mod rendering;
pub mod slides;
pub mod surface;
pub mod view;

pub use app::App;
pub use config::{Config, ExportConfig, Rgb, Viewport};
pub use export::{ExportOutcome, ExportReport, Exporter};
pub use rendering::{Capture, CaptureOptions};
pub use slides::{Slide, SLIDES};
pub use surface::{SlideBlock, Surface, TextSnapshot};

/// Create the stock application: the static deck, built-in capture and
/// document capabilities, saving into `config.export.output_dir`. The page
/// is mounted and ready for [`App::download`].
pub fn new_app(config: Config) -> Result<App> {
    config.validate()?;
    let exporter = Exporter::with_defaults(config.export.clone());
    let app = App::new(config, SLIDES, exporter);
    app.mount()?;
    Ok(app)
}
