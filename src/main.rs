//! Command-line driver: classify a JSON-lines stream of pose landmarks.

use anyhow::{Context, Result};
use clap::Parser;
use landmark_action::{
    app::{ActionApp, InputSource, OutputFormat},
    config::Config,
};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines file of landmark frames (stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Minimum landmark confidence
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Distance a wrist must clear above its shoulder
    #[arg(short, long)]
    margin: Option<f32>,

    /// Label smoothing (none, majority[:N], debounce[:N])
    #[arg(short, long)]
    smoothing: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Print the example configuration and exit
    #[arg(long)]
    example_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.example_config {
        print!("{}", landmark_action::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("Landmark Action Classifier");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    config
        .apply_overrides(args.threshold, args.margin, args.smoothing.as_deref())
        .context("Invalid command line override")?;
    config.validate().context("Invalid configuration")?;

    let format: OutputFormat = args.format.parse()?;
    let source = match args.input {
        Some(path) => InputSource::File(path),
        None => InputSource::Stdin,
    };

    let mut app = ActionApp::new(&config, format)?;
    let stdout = io::stdout();

    match source {
        InputSource::File(path) => {
            info!("Reading frames from: {}", path.display());
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            app.run(BufReader::new(file), stdout.lock())?;
        }
        InputSource::Stdin => {
            info!("Reading frames from stdin");
            app.run(io::stdin().lock(), stdout.lock())?;
        }
    }

    Ok(())
}
