use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info};

use crate::color::Color;
use crate::pipeline::generate::DesignPalette;

/// CIEDE2000 distance below which two colors are indistinguishable to most viewers.
pub const DEFAULT_MAX_DELTA_E: f32 = 2.3;

/// Comments, plus quoted strings so that `//` inside a URL is not taken for one.
static COMMENT_OR_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|/\*.*?\*/|//[^\n]*"#)
        .expect("valid comment regex")
});
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_-]*)\s*:\s*([^;{}]+?)\s*(?:!default|!global)?\s*;")
        .expect("valid declaration regex")
});
static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
        .expect("valid rgb() regex")
});

/// A color variable declared in an existing stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScssVariable {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// An existing variable is close enough to stand in for the generated color.
    Reuse,
    /// No existing variable is close enough; the generated color is new.
    New,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestVariable {
    pub name: String,
    pub color: Color,
    pub delta_e: f32,
}

/// How one palette role relates to the existing variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMatch {
    pub role: String,
    pub color: Color,
    pub nearest: Option<NearestVariable>,
    pub status: MatchStatus,
}

impl VariableMatch {
    /// The existing variable to use in place of the generated color, if any.
    pub fn reused(&self) -> Option<&NearestVariable> {
        match self.status {
            MatchStatus::Reuse => self.nearest.as_ref(),
            MatchStatus::New => None,
        }
    }
}

/// Sass treats `-` and `_` in variable names as the same character.
pub fn normalize_name(name: &str) -> String {
    name.replace('_', "-")
}

fn strip_comments(source: &str) -> String {
    COMMENT_OR_STRING
        .replace_all(source, |caps: &Captures| {
            let text = &caps[0];
            if text.starts_with('/') {
                String::new()
            } else {
                text.to_string()
            }
        })
        .into_owned()
}

/// Collect color variables from SCSS source.
///
/// Values may be hex colors, `rgb()` triples or references to variables
/// declared earlier. Anything else is skipped.
pub fn parse_scss_variables(source: &str) -> Vec<ScssVariable> {
    let source = strip_comments(source);

    // keyed by normalized name; the first spelling seen is kept
    let mut variables: IndexMap<String, ScssVariable> = IndexMap::new();
    for caps in DECLARATION.captures_iter(&source) {
        let name = &caps[1];
        let value = &caps[2];
        match parse_value(value, &variables) {
            Some(color) => {
                variables
                    .entry(normalize_name(name))
                    .and_modify(|var| var.color = color)
                    .or_insert_with(|| ScssVariable {
                        name: name.to_string(),
                        color,
                    });
            }
            None => debug!(name, value, "skipping non-color variable"),
        }
    }

    variables.into_values().collect()
}

fn parse_value(value: &str, known: &IndexMap<String, ScssVariable>) -> Option<Color> {
    if let Some(reference) = value.strip_prefix('$') {
        return known.get(&normalize_name(reference)).map(|var| var.color);
    }
    if value.starts_with('#') {
        return Color::from_hex(value).ok();
    }
    let caps = RGB_FUNCTION.captures(value)?;
    let channel = |i: usize| caps[i].parse::<u8>().ok();
    Some(Color::new(channel(1)?, channel(2)?, channel(3)?))
}

/// Read and parse an existing SCSS file.
pub fn load_scss_variables(path: &Path) -> Result<Vec<ScssVariable>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read stylesheet: {}", path.display()))?;
    let variables = parse_scss_variables(&source);
    info!(
        path = %path.display(),
        variables = variables.len(),
        "loaded existing color variables"
    );
    Ok(variables)
}

/// Match every palette role to its nearest existing variable (CIEDE2000).
pub fn map_to_existing(
    palette: &DesignPalette,
    existing: &[ScssVariable],
    max_delta_e: f32,
) -> Vec<VariableMatch> {
    palette
        .entries()
        .into_iter()
        .map(|(role, color)| {
            let nearest = nearest_variable(color, existing);
            let status = match &nearest {
                Some(n) if n.delta_e <= max_delta_e => MatchStatus::Reuse,
                _ => MatchStatus::New,
            };
            VariableMatch {
                role,
                color,
                nearest,
                status,
            }
        })
        .collect()
}

fn nearest_variable(color: Color, existing: &[ScssVariable]) -> Option<NearestVariable> {
    let mut best: Option<NearestVariable> = None;
    for variable in existing {
        let delta_e = Color::delta_e(&color, &variable.color);
        if best.as_ref().map_or(true, |b| delta_e < b.delta_e) {
            best = Some(NearestVariable {
                name: variable.name.clone(),
                color: variable.color,
                delta_e,
            });
        }
    }
    best
}
