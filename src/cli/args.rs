//! CLI argument definitions.

use crate::cli::validators::{parse_origin, parse_positive_usize};
use crate::config::{Config, InferenceDevice, ModelConfig};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Predict where a satellite image was taken.
#[derive(Debug, Parser)]
#[command(name = "geolocate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: serve).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Server options used when no subcommand is given.
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "GEOLOCATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve predictions over HTTP.
    Serve(ServeArgs),
    /// Predict locations for image files and print one JSON line per image.
    Predict {
        /// Image files to analyze.
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Model options.
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// HTTP server options. Each overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "GEOLOCATE_HOST")]
    pub host: Option<String>,

    /// Port to bind.
    #[arg(short, long, env = "GEOLOCATE_PORT")]
    pub port: Option<u16>,

    /// Allowed CORS origins (comma-separated, `*` for any).
    #[arg(long, value_delimiter = ',', value_parser = parse_origin, env = "CORS_ORIGINS")]
    pub cors_origins: Option<Vec<String>>,

    /// Maximum upload size in bytes.
    #[arg(long, value_parser = parse_positive_usize, env = "GEOLOCATE_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Model options.
    #[command(flatten)]
    pub model: ModelArgs,
}

impl ServeArgs {
    /// Apply command-line overrides onto a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origins) = &self.cors_origins {
            config.server.cors_origins.clone_from(origins);
        }
        if let Some(limit) = self.max_upload_bytes {
            config.server.max_upload_bytes = limit;
        }
        self.model.apply_to(&mut config.model);
    }
}

/// Model options. Each overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Path to the ONNX model file.
    #[arg(short, long, env = "GEOLOCATE_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Inference device.
    #[arg(long, value_enum, env = "GEOLOCATE_DEVICE")]
    pub device: Option<InferenceDevice>,

    /// Intra-op thread count for inference.
    #[arg(long, value_parser = parse_positive_usize, env = "GEOLOCATE_THREADS")]
    pub threads: Option<usize>,
}

impl ModelArgs {
    /// Apply command-line overrides onto model configuration.
    pub fn apply_to(&self, model: &mut ModelConfig) {
        if let Some(path) = &self.model_path {
            model.path.clone_from(path);
        }
        if let Some(device) = self.device {
            model.device = device;
        }
        if let Some(threads) = self.threads {
            model.intra_threads = Some(threads);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["geolocate", "--port", "9000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.port, Some(9000));
    }

    #[test]
    fn test_serve_overrides_config() {
        let cli = Cli::try_parse_from([
            "geolocate",
            "serve",
            "--host",
            "127.0.0.1",
            "--cors-origins",
            "https://a.example,https://b.example",
            "--model-path",
            "/srv/geo.onnx",
            "--device",
            "cpu",
        ])
        .unwrap();

        let Some(Command::Serve(args)) = cli.command else {
            unreachable!("expected serve subcommand");
        };

        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.model.path, PathBuf::from("/srv/geo.onnx"));
        assert_eq!(config.model.device, InferenceDevice::Cpu);
    }

    #[test]
    fn test_predict_requires_images() {
        assert!(Cli::try_parse_from(["geolocate", "predict"]).is_err());

        let cli = Cli::try_parse_from(["geolocate", "predict", "a.png", "b.jpg", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Some(Command::Predict { ref images, .. }) if images.len() == 2));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["geolocate", "-q", "-v"]).is_err());
    }
}
