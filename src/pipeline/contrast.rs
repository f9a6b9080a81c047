use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Color;
use crate::pipeline::generate::{
    DesignPalette, GRAY_DARK, GRAY_LIGHT, PRIMARY, PRIMARY_DARK, PRIMARY_LIGHT, SECONDARY,
};

/// WCAG AA minimum for normal text.
pub const WCAG_AA: f32 = 4.5;
/// WCAG AAA minimum for normal text.
pub const WCAG_AAA: f32 = 7.0;

const TEXT_ROLES: [&str; 2] = [GRAY_LIGHT, GRAY_DARK];
const BACKGROUND_ROLES: [&str; 4] = [PRIMARY, SECONDARY, PRIMARY_LIGHT, PRIMARY_DARK];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContrastThresholds {
    pub acceptable: f32,
    pub good: f32,
}

impl Default for ContrastThresholds {
    fn default() -> Self {
        Self {
            acceptable: WCAG_AA,
            good: WCAG_AAA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastRating {
    Good,
    Acceptable,
    Insufficient,
}

impl ContrastRating {
    pub fn rate(ratio: f32, thresholds: &ContrastThresholds) -> Self {
        if ratio >= thresholds.good {
            ContrastRating::Good
        } else if ratio >= thresholds.acceptable {
            ContrastRating::Acceptable
        } else {
            ContrastRating::Insufficient
        }
    }
}

impl fmt::Display for ContrastRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContrastRating::Good => "good",
            ContrastRating::Acceptable => "acceptable",
            ContrastRating::Insufficient => "insufficient",
        };
        f.write_str(label)
    }
}

/// Contrast of one text role drawn over one background role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastCheck {
    pub text: String,
    pub background: String,
    pub text_color: Color,
    pub background_color: Color,
    pub ratio: f32,
    pub rating: ContrastRating,
}

impl fmt::Display for ContrastCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}: {:.2}:1 {}",
            self.text, self.background, self.ratio, self.rating
        )
    }
}

/// Check every text gray against every primary-derived background.
pub fn analyze_contrast(
    palette: &DesignPalette,
    thresholds: &ContrastThresholds,
) -> Vec<ContrastCheck> {
    let mut checks = Vec::with_capacity(TEXT_ROLES.len() * BACKGROUND_ROLES.len());
    for text in TEXT_ROLES {
        for background in BACKGROUND_ROLES {
            let (Some(text_color), Some(background_color)) =
                (palette.get(text), palette.get(background))
            else {
                continue;
            };
            let ratio = Color::contrast_ratio(&text_color, &background_color);
            let rating = ContrastRating::rate(ratio, thresholds);
            if rating == ContrastRating::Insufficient {
                warn!(text, background, ratio, "insufficient contrast");
            }
            checks.push(ContrastCheck {
                text: text.to_string(),
                background: background.to_string(),
                text_color,
                background_color,
                ratio,
                rating,
            });
        }
    }
    checks
}

/// Pick whichever text gray reads better on `background`.
pub fn readable_text(palette: &DesignPalette, background: Color) -> Color {
    let light = Color::contrast_ratio(&palette.gray_light, &background);
    let dark = Color::contrast_ratio(&palette.gray_dark, &background);
    if light >= dark {
        palette.gray_light
    } else {
        palette.gray_dark
    }
}
