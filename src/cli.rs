//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use potree_frame::DEFAULT_PREVIEW_BYTES;
use potree_invoke::{ConfigLayer, Region};

/// potree-extract - point-cloud region extraction client
#[derive(Parser, Debug)]
#[command(name = "potree-extract")]
#[command(version)]
#[command(about = "Run a point-cloud region extraction and print its decoded response")]
#[command(
    long_about = "Invokes the extraction executable on a point cloud with a region, width and level range, \
                  then decodes the length-prefixed response it writes to stdout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the extraction executable and print its response
    Extract(ExtractArgs),

    /// Decode a previously captured response file
    Decode {
        /// Captured response file
        file: PathBuf,

        /// Payload bytes to show
        #[arg(long, default_value_t = DEFAULT_PREVIEW_BYTES)]
        preview_bytes: usize,
    },
}

/// Options for the `extract` command.
///
/// Precedence: flags, then the config file, then `POTREE_EXTRACT_*`
/// environment variables.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// TOML file with extraction settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extraction executable (path or name on PATH)
    #[arg(short, long)]
    pub executable: Option<PathBuf>,

    /// Point cloud to extract from
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Region as "{x0, y0},{x1, y1},..."
    #[arg(long, value_parser = parse_region)]
    pub coordinates: Option<Region>,

    /// Width of the region
    #[arg(short, long)]
    pub width: Option<f64>,

    /// Shallowest octree level
    #[arg(long)]
    pub min_level: Option<u32>,

    /// Deepest octree level
    #[arg(long)]
    pub max_level: Option<u32>,

    /// Payload bytes to show
    #[arg(long, default_value_t = DEFAULT_PREVIEW_BYTES)]
    pub preview_bytes: usize,

    /// Also write the raw captured response to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

impl ExtractArgs {
    /// The configuration layer set by flags alone.
    #[must_use]
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            executable_path: self.executable.clone(),
            input_path: self.input.clone(),
            region_coordinates: self.coordinates.clone(),
            width: self.width,
            min_level: self.min_level,
            max_level: self.max_level,
        }
    }
}

fn parse_region(value: &str) -> Result<Region, String> {
    value.parse().map_err(|e: potree_invoke::InvokeError| e.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::try_parse_from([
            "potree-extract",
            "extract",
            "--input",
            "cloud.js",
            "--coordinates",
            "{1, 2},{3, 4}",
            "--width",
            "14.0",
            "--max-level",
            "1",
        ])
        .unwrap();

        let Commands::Extract(args) = cli.command else {
            panic!("expected extract command");
        };

        let layer = args.overrides();
        assert_eq!(layer.input_path, Some(PathBuf::from("cloud.js")));
        assert_eq!(layer.width, Some(14.0));
        assert_eq!(layer.min_level, None);
        assert_eq!(layer.max_level, Some(1));
        assert_eq!(args.preview_bytes, DEFAULT_PREVIEW_BYTES);
    }

    #[test]
    fn test_bad_coordinates_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "potree-extract",
            "extract",
            "--coordinates",
            "1,2",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_decode_command() {
        let cli =
            Cli::try_parse_from(["potree-extract", "decode", "out.bin", "--preview-bytes", "8"])
                .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Decode { preview_bytes: 8, .. }
        ));
    }
}
