//! Entry point for the flora map viewer.
//!
//! Loads an observation dataset (CSV, TSV or JSON) and shows it as a
//! searchable map in a Dioxus desktop window.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::Parser;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;

use flora_core::{DataSource, FloraResult, MapConfig};
use flora_logging::{FileConfig, FloraSubscriberBuilder};
use flora_viewer::components::App;
use flora_viewer::state::ViewerState;

/// CSS styles embedded at compile time.
const STYLES_CSS: &str = include_str!("../assets/styles.css");

/// Dataset read when neither the command line nor the config names one.
const DEFAULT_DATASET: &str = "datos.csv";

/// Everything the root component needs, resolved before launch.
#[derive(Debug)]
struct Launch {
    config: MapConfig,
    source: DataSource,
    query: Option<String>,
}

static LAUNCH: OnceLock<Launch> = OnceLock::new();

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "flora-viewer")]
#[command(about = "Desktop map viewer for Andean flora observations")]
struct Args {
    /// Dataset to load (CSV, TSV or JSON)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML file with map settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial search query
    #[arg(short, long)]
    query: Option<String>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Human-readable console logs instead of JSONL
    #[arg(long)]
    pretty: bool,

    /// Also write JSONL logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let mut logging = FloraSubscriberBuilder::new()
        .with_level(args.log_level.clone())
        .with_pretty(args.pretty);
    if let Some(directory) = args.log_dir.clone() {
        logging = logging.with_file_output(FileConfig {
            directory,
            ..FileConfig::default()
        });
    }
    let _log_guard = logging.init();

    tracing::info!("Starting Flora Viewer");

    let launch = match resolve_launch(args) {
        Ok(launch) => launch,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start viewer");
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    LAUNCH.set(launch).ok();

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title("Flora Andina - Mapa de observaciones")
                        .with_inner_size(LogicalSize::new(1400, 900)),
                )
                .with_custom_head(format!("<style>{}</style>", STYLES_CSS)),
        )
        .launch(RootApp);
}

/// Reads the map config and picks the dataset.
fn resolve_launch(args: Args) -> FloraResult<Launch> {
    let config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };

    // Command line wins over the config file
    let dataset = args
        .file
        .or_else(|| config.dataset.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    Ok(Launch {
        config,
        source: DataSource::path(dataset),
        query: args.query,
    })
}

/// Root application component that owns the load.
#[component]
fn RootApp() -> Element {
    let state = use_signal(|| {
        let (config, source, query) = match LAUNCH.get() {
            Some(launch) => (
                launch.config.clone(),
                launch.source.describe(),
                launch.query.clone(),
            ),
            None => (MapConfig::default(), DEFAULT_DATASET.to_string(), None),
        };
        let mut viewer = ViewerState::new(config, source);
        if let Some(query) = query {
            viewer.set_search(query);
        }
        viewer
    });

    use_drop(|| {
        tracing::info!("Shutting down Flora Viewer");
    });

    // Load once; the session is built when records arrive
    let _loader = use_resource(move || {
        let mut state = state;

        async move {
            let Some(launch) = LAUNCH.get() else {
                return;
            };

            match flora_core::load(&launch.source).await {
                Ok(records) => state.write().install(records),
                Err(e) => state.write().fail(&e),
            }
        }
    });

    rsx! {
        App { state }
    }
}
