use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use slidepress::accessibility::AccessibilityProvider;
use slidepress::view::{render_page, ViewSnapshot};
use slidepress::{Config, ExportOutcome};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slidepress", version, about = "Render the slide deck and export it as a PDF")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture every slide and save the PDF
    Export {
        /// Directory the PDF is saved into
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Capture upscaling factor
        #[arg(short, long)]
        scale: Option<u32>,
        /// Give up on a single capture after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Print the rendered page markup
    Html {
        /// Render the button in its busy state
        #[arg(long)]
        busy: bool,
    },
    /// Print the page text and its accessibility outline
    Outline,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(p) => Config::from_json_file(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Export {
            out_dir,
            scale,
            timeout_ms,
        } => {
            if let Some(dir) = out_dir {
                config.export.output_dir = dir;
            }
            if let Some(scale) = scale {
                config.export.scale = scale;
            }
            if timeout_ms.is_some() {
                config.export.capture_timeout_ms = timeout_ms;
            }
            let app = slidepress::new_app(config).context("invalid configuration")?;
            match app.download().await {
                ExportOutcome::Saved(report) => {
                    println!("{}", report.location.display());
                }
                ExportOutcome::Skipped => bail!("export did not start"),
                ExportOutcome::Failed(_) => {
                    eprintln!("{}", app.snapshot().error.unwrap_or_default());
                    std::process::exit(1);
                }
            }
        }
        Command::Html { busy } => {
            let snapshot = ViewSnapshot { busy, error: None };
            print!("{}", render_page(&slidepress::slides::DECK, slidepress::SLIDES, &snapshot)?);
        }
        Command::Outline => {
            let app = slidepress::new_app(config).context("invalid configuration")?;
            let surface = app.surface().context("page is not mounted")?;
            let snapshot = surface.text_snapshot()?;
            println!("{}\n", snapshot.title);
            println!("{}\n", snapshot.text);
            print!("{}", surface.export_tree().outline());
        }
    }
    Ok(())
}
