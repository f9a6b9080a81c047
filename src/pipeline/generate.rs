use anyhow::{bail, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::color::Color;
use crate::pipeline::extract::ExtractedColor;

pub const PRIMARY: &str = "primary";
pub const PRIMARY_DARK: &str = "primary-dark";
pub const PRIMARY_LIGHT: &str = "primary-light";
pub const SECONDARY: &str = "secondary";
pub const ACCENT: &str = "accent";
pub const GRAY_LIGHT: &str = "gray-light";
pub const GRAY_MEDIUM: &str = "gray-medium";
pub const GRAY_DARK: &str = "gray-dark";

/// Neutral grays used for text and surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grays {
    pub light: Color,
    pub medium: Color,
    pub dark: Color,
}

impl Default for Grays {
    fn default() -> Self {
        Self {
            light: Color::new(240, 240, 240),
            medium: Color::new(150, 150, 150),
            dark: Color::new(50, 50, 50),
        }
    }
}

/// How the palette is derived from the dominant colors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PaletteOptions {
    /// HSV value step for the dark and light primary variants.
    pub brightness_step: f32,
    /// Hue rotation (degrees) for the secondary color.
    pub complement_shift: f32,
    /// Hue rotation (degrees) for the accent color.
    pub accent_shift: f32,
    /// How many further dominant colors are kept as `additional-N`.
    pub max_additional: usize,
    pub grays: Grays,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            brightness_step: 0.3,
            complement_shift: 180.0,
            accent_shift: 90.0,
            max_additional: 3,
            grays: Grays::default(),
        }
    }
}

/// A design-system palette with fixed, named roles.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignPalette {
    pub primary: Color,
    pub primary_dark: Color,
    pub primary_light: Color,
    pub secondary: Color,
    pub accent: Color,
    pub gray_light: Color,
    pub gray_medium: Color,
    pub gray_dark: Color,
    /// Further dominant colors, most frequent first.
    pub additional: Vec<Color>,
}

impl DesignPalette {
    /// All roles with their kebab-case names, in canonical order.
    pub fn entries(&self) -> Vec<(String, Color)> {
        let mut entries: Vec<(String, Color)> = [
            (PRIMARY, self.primary),
            (PRIMARY_DARK, self.primary_dark),
            (PRIMARY_LIGHT, self.primary_light),
            (SECONDARY, self.secondary),
            (ACCENT, self.accent),
            (GRAY_LIGHT, self.gray_light),
            (GRAY_MEDIUM, self.gray_medium),
            (GRAY_DARK, self.gray_dark),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        entries.extend(
            self.additional
                .iter()
                .enumerate()
                .map(|(i, color)| (format!("additional-{}", i + 1), *color)),
        );
        entries
    }

    /// Look up a role by name.
    pub fn get(&self, role: &str) -> Option<Color> {
        self.entries()
            .into_iter()
            .find(|(name, _)| name == role)
            .map(|(_, color)| color)
    }
}

impl Serialize for DesignPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, color) in &entries {
            map.serialize_entry(name, color)?;
        }
        map.end()
    }
}

/// Derive the full palette from dominant colors sorted by weight.
///
/// The heaviest color becomes the primary; darker/lighter variants step its
/// HSV value, secondary and accent rotate its hue.
pub fn generate_palette(
    colors: &[ExtractedColor],
    options: &PaletteOptions,
) -> Result<DesignPalette> {
    let Some(first) = colors.first() else {
        bail!("no dominant colors to build a palette from");
    };
    let primary = first.color;

    let palette = DesignPalette {
        primary,
        primary_dark: primary.adjust_value(-options.brightness_step),
        primary_light: primary.adjust_value(options.brightness_step),
        secondary: primary.shift_hue(options.complement_shift),
        accent: primary.shift_hue(options.accent_shift),
        gray_light: options.grays.light,
        gray_medium: options.grays.medium,
        gray_dark: options.grays.dark,
        additional: colors
            .iter()
            .skip(1)
            .take(options.max_additional)
            .map(|c| c.color)
            .collect(),
    };

    debug!(
        primary = %palette.primary,
        additional = palette.additional.len(),
        "generated palette"
    );
    Ok(palette)
}
