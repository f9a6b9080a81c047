use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use serde::Deserialize;

/// Extract a design-system color palette from a logo image.
#[derive(Parser, Debug)]
#[command(name = "logo-palette", version, about)]
pub struct Args {
    /// Path to the logo image
    pub image: PathBuf,

    /// Number of K-means clusters
    #[arg(short = 'k', long = "colors")]
    pub colors: Option<usize>,

    /// Write the stylesheet to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stylesheet format (inferred from --output's extension if omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Variable name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Existing SCSS file whose color variables should be reused
    #[arg(long, value_name = "SCSS")]
    pub existing: Option<PathBuf>,

    /// Largest CIEDE2000 distance at which an existing variable is reused
    #[arg(long)]
    pub max_delta_e: Option<f32>,

    /// Skip the WCAG contrast check
    #[arg(long)]
    pub no_contrast: bool,

    /// Print a colored terminal preview of the palette
    #[arg(long)]
    pub preview: bool,

    /// Save a swatch preview image
    #[arg(long, value_name = "PNG")]
    pub preview_image: Option<PathBuf>,

    /// K-means seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Scss,
    Css,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "scss" => Some(OutputFormat::Scss),
            "css" => Some(OutputFormat::Css),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}
