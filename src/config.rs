//! Run configuration: JSON file defaults layered under command-line flags.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::cli::{Args, OutputFormat};
use crate::pipeline::contrast::ContrastThresholds;
use crate::pipeline::extract::{DEFAULT_MAX_DIM, DEFAULT_SEED};
use crate::pipeline::generate::PaletteOptions;
use crate::pipeline::mapping::DEFAULT_MAX_DELTA_E;

/// Config file picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_PATH: &str = "logo-palette.json";
/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "LOGO_PALETTE_CONFIG";

const MAX_COLORS: usize = 32;
const MIN_DIM: u32 = 8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Number of K-means clusters.
    pub colors: usize,
    pub seed: u64,
    /// Images are shrunk to fit within this many pixels per side.
    pub max_dim: u32,
    /// Variable name prefix, e.g. `color` gives `$color-primary`.
    pub prefix: String,
    pub format: OutputFormat,
    pub palette: PaletteOptions,
    pub contrast: ContrastThresholds,
    pub max_delta_e: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: 5,
            seed: DEFAULT_SEED,
            max_dim: DEFAULT_MAX_DIM,
            prefix: "color".to_string(),
            format: OutputFormat::default(),
            palette: PaletteOptions::default(),
            contrast: ContrastThresholds::default(),
            max_delta_e: DEFAULT_MAX_DELTA_E,
        }
    }
}

impl Config {
    /// Load configuration from `explicit`, `$LOGO_PALETTE_CONFIG` or
    /// `./logo-palette.json`, in that order. Falls back to built-in defaults
    /// when none of them applies.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit, std::env::var_os(CONFIG_PATH_ENV)) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file; using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a JSON config file. Values are checked by [`Config::validate`]
    /// once command-line flags have been layered on top.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Layer command-line flags over the file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(colors) = args.colors {
            self.colors = colors;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(prefix) = &args.prefix {
            self.prefix.clone_from(prefix);
        }
        if let Some(max_delta_e) = args.max_delta_e {
            self.max_delta_e = max_delta_e;
        }
        if let Some(format) = args
            .format
            .or_else(|| args.output.as_deref().and_then(OutputFormat::from_path))
        {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COLORS).contains(&self.colors) {
            bail!(
                "colors must be between 1 and {MAX_COLORS}, got {}",
                self.colors
            );
        }
        if self.max_dim < MIN_DIM {
            bail!("max-dim must be at least {MIN_DIM}, got {}", self.max_dim);
        }
        if self.prefix.trim().is_empty() {
            bail!("prefix must not be empty");
        }
        let ContrastThresholds { acceptable, good } = self.contrast;
        if acceptable < 1.0 || good < 1.0 || acceptable > good {
            bail!(
                "contrast thresholds must satisfy 1 <= acceptable <= good, got {acceptable} and {good}"
            );
        }
        if self.max_delta_e.is_nan() || self.max_delta_e < 0.0 {
            bail!("max-delta-e must be non-negative, got {}", self.max_delta_e);
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_value.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    default.exists().then_some(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use clap::Parser;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("logo-palette-config-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.colors, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_dim, 100);
        assert_eq!(config.prefix, "color");
        assert_eq!(config.format, OutputFormat::Scss);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = write_config(
            "partial.json",
            r##"{"colors": 8, "prefix": "brand", "palette": {"grays": {"light": "#fafafa"}}}"##,
        );
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.colors, 8);
        assert_eq!(config.prefix, "brand");
        assert_eq!(config.palette.grays.light, Color::new(250, 250, 250));
        assert_eq!(config.palette.grays.dark, Color::new(50, 50, 50));
        assert_eq!(config.max_dim, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let path = write_config("unknown.json", r#"{"colours": 8}"#);
        let err = format!("{:#}", Config::from_file(&path).unwrap_err());
        assert!(err.contains("invalid config"), "got {err}");
    }

    #[test]
    fn invalid_values_fail_validation() {
        let path = write_config("zero.json", r#"{"colors": 0}"#);
        assert!(Config::from_file(&path).unwrap().validate().is_err());

        let path = write_config(
            "thresholds.json",
            r#"{"contrast": {"acceptable": 8.0, "good": 7.0}}"#,
        );
        assert!(Config::from_file(&path).unwrap().validate().is_err());
    }

    #[test]
    fn cli_flag_repairs_out_of_range_file_value() {
        let path = write_config("too-many-colors.json", r#"{"colors": 40}"#);
        let mut config = Config::load(Some(&path)).unwrap();
        assert!(config.validate().is_err());

        let args = Args::try_parse_from(["logo-palette", "logo.png", "-k", "5"]).unwrap();
        config.apply_args(&args);
        config.validate().unwrap();
        assert_eq!(config.colors, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/logo-palette.json")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to read config"), "got {err}");
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let resolved = resolve_config_path(
            Some(Path::new("cli.json")),
            Some(OsString::from("env.json")),
        );
        assert_eq!(resolved, Some(PathBuf::from("cli.json")));

        let resolved = resolve_config_path(None, Some(OsString::from("env.json")));
        assert_eq!(resolved, Some(PathBuf::from("env.json")));
    }

    #[test]
    fn validate_bounds() {
        let mut config = Config {
            colors: 33,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        config.colors = 32;
        config.max_dim = 4;
        assert!(config.validate().is_err());
        config.max_dim = 8;
        config.prefix = " ".into();
        assert!(config.validate().is_err());
        config.prefix = "c".into();
        config.max_delta_e = f32::NAN;
        assert!(config.validate().is_err());
        config.max_delta_e = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = Config {
            colors: 8,
            prefix: "file".into(),
            ..Config::default()
        };
        let args = Args::try_parse_from([
            "logo-palette",
            "logo.png",
            "-k",
            "3",
            "--prefix",
            "cli",
            "-o",
            "theme.css",
        ])
        .unwrap();
        config.apply_args(&args);
        assert_eq!(config.colors, 3);
        assert_eq!(config.prefix, "cli");
        assert_eq!(config.format, OutputFormat::Css);
    }

    #[test]
    fn explicit_format_beats_output_extension() {
        let mut config = Config::default();
        let args =
            Args::try_parse_from(["logo-palette", "logo.png", "-o", "theme.css", "-f", "json"])
                .unwrap();
        config.apply_args(&args);
        assert_eq!(config.format, OutputFormat::Json);
    }
}
