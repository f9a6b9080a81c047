use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::pipeline::contrast::{analyze_contrast, ContrastCheck};
use crate::pipeline::extract::{extract_colors, load_and_prepare, ExtractedColor};
use crate::pipeline::generate::{generate_palette, DesignPalette};
use crate::pipeline::mapping::{map_to_existing, normalize_name, ScssVariable, VariableMatch};

/// Everything one run produces: the palette plus the optional analyses.
#[derive(Debug, Clone, Serialize)]
pub struct PaletteReport {
    /// File name of the source image.
    pub source: String,
    pub dominant: Vec<ExtractedColor>,
    pub palette: DesignPalette,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<Vec<ContrastCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<VariableMatch>>,
    /// Variable name prefix used by the stylesheet backends.
    #[serde(skip)]
    pub prefix: String,
}

impl PaletteReport {
    /// Run the whole pipeline on an image.
    pub fn build(
        image: &Path,
        config: &Config,
        existing: Option<&[ScssVariable]>,
        check_contrast: bool,
    ) -> Result<Self> {
        let pixels = load_and_prepare(image, config.max_dim)?;
        let dominant = extract_colors(&pixels, config.colors, config.seed);
        let source = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        Self::from_colors(source, dominant, config, existing, check_contrast)
    }

    /// Build a report from colors that were already extracted.
    pub fn from_colors(
        source: String,
        dominant: Vec<ExtractedColor>,
        config: &Config,
        existing: Option<&[ScssVariable]>,
        check_contrast: bool,
    ) -> Result<Self> {
        let palette = generate_palette(&dominant, &config.palette)?;
        let contrast = check_contrast.then(|| analyze_contrast(&palette, &config.contrast));
        let variables = existing.map(|vars| {
            let candidates = reuse_candidates(&palette, &config.prefix, vars);
            map_to_existing(&palette, &candidates, config.max_delta_e)
        });

        Ok(Self {
            source,
            dominant,
            palette,
            contrast,
            variables,
            prefix: config.prefix.clone(),
        })
    }

    /// The mapping entry for a palette role, when a mapping was requested.
    pub fn variable_for(&self, role: &str) -> Option<&VariableMatch> {
        self.variables
            .as_ref()?
            .iter()
            .find(|m| m.role == role)
    }

    /// Full variable name for a role, e.g. `color-primary`.
    pub fn variable_name(&self, role: &str) -> String {
        prefixed(&self.prefix, role)
    }
}

fn prefixed(prefix: &str, role: &str) -> String {
    format!("{prefix}-{role}")
}

/// Existing variables that may stand in for a role. A variable sharing a name
/// with one we generate would end up referencing itself or being redefined.
fn reuse_candidates(
    palette: &DesignPalette,
    prefix: &str,
    existing: &[ScssVariable],
) -> Vec<ScssVariable> {
    let generated: Vec<String> = palette
        .entries()
        .iter()
        .map(|(role, _)| normalize_name(&prefixed(prefix, role)))
        .collect();

    existing
        .iter()
        .filter(|var| {
            let clashes = generated.contains(&normalize_name(&var.name));
            if clashes {
                warn!(
                    name = %var.name,
                    "existing variable has the same name as a generated one; not reusing it"
                );
            }
            !clashes
        })
        .cloned()
        .collect()
}
