//! Geolocate - satellite image geolocation service.
//!
//! This crate serves longitude/latitude predictions for uploaded images
//! using a pre-trained ONNX regression model.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod server;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, ServeArgs};
use config::{
    Config, config_file_path, load_config_file, load_default_config, save_config,
    validate_config,
};
use inference::{InferenceEngine, ModelLoader, Prediction};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

pub use error::{Error, Result};

/// How long shutdown waits for a model load still running on the blocking pool.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Main entry point for the geolocate CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };

    match cli.command {
        Some(Command::Config { action }) => handle_config_command(action, cli.config.as_deref()),
        Some(Command::Predict { images, model }) => {
            let mut config = config;
            model.apply_to(&mut config.model);
            validate_config(&config)?;
            predict_files(&images, &config)
        }
        Some(Command::Serve(args)) => serve(&args, config),
        None => serve(&cli.serve, config),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is noisy at info level; only show it when asked for.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout carries `predict` results.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn serve(args: &ServeArgs, mut config: Config) -> Result<()> {
    args.apply_to(&mut config);
    validate_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;

    let result = runtime.block_on(server::serve(config));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    result
}

/// One line of `predict` output.
#[derive(Debug, Serialize)]
struct FilePrediction {
    file: String,
    #[serde(flatten)]
    prediction: Prediction,
}

fn predict_files(images: &[PathBuf], config: &Config) -> Result<()> {
    let engine = ModelLoader::from_config(config).load()?;

    let mut failed = 0;
    for path in images {
        match predict_file(&engine, path) {
            Ok(prediction) => {
                let line = serde_json::to_string(&FilePrediction {
                    file: path.display().to_string(),
                    prediction,
                })
                .map_err(|e| Error::Internal {
                    message: format!("failed to serialize prediction: {e}"),
                })?;
                println!("{line}");
            }
            Err(e) => {
                error!("{}: {e}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::PredictFailures {
            failed,
            total: images.len(),
        });
    }

    info!("Predicted {} image(s)", images.len());
    Ok(())
}

fn predict_file(engine: &InferenceEngine, path: &Path) -> Result<Prediction> {
    let bytes = std::fs::read(path).map_err(|e| Error::ImageRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let image = imaging::decode_image(&bytes).map_err(|e| Error::InvalidImage {
        path: path.to_path_buf(),
        source: e,
    })?;

    engine.predict(&image)
}

fn handle_config_command(action: ConfigAction, explicit_path: Option<&Path>) -> Result<()> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  set [model] path to your ONNX weights, then run 'geolocate serve'");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(&path)?;
            let contents = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
