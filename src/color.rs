use std::fmt;
use std::str::FromStr;

use palette::color_difference::Ciede2000;
use palette::{FromColor, Hsv, IntoColor, Lab, ShiftHue, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("invalid hex color: expected 3 or 6 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex color: '{0}' is not a hex digit")]
    InvalidDigit(char),
}

/// Core color type used throughout the pipeline.
/// Wraps sRGB u8 components and provides conversions to the spaces each step works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800`, `FF8800` or the short form `#f80`.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let nibbles = hex
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(ParseColorError::InvalidDigit(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        match nibbles[..] {
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Ok(Self::new(
                (r1 << 4) | r2,
                (g1 << 4) | g2,
                (b1 << 4) | b2,
            )),
            _ => Err(ParseColorError::InvalidLength(nibbles.len())),
        }
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to CIELAB (for K-means clustering and color distance).
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(lab))
    }

    /// Convert to HSV (for hue rotation and brightness steps).
    pub fn to_hsv(self) -> Hsv {
        Hsv::from_color(self.to_srgb_f32())
    }

    /// Create from HSV.
    pub fn from_hsv(hsv: Hsv) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(hsv))
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// Rotate the HSV hue by `degrees`, keeping saturation and value.
    pub fn shift_hue(self, degrees: f32) -> Color {
        Color::from_hsv(self.to_hsv().shift_hue(degrees))
    }

    /// Adjust HSV value by `delta`. Positive = brighter, negative = darker.
    /// Value is clamped to [0, 1].
    pub fn adjust_value(self, delta: f32) -> Color {
        let mut hsv = self.to_hsv();
        hsv.value = (hsv.value + delta).clamp(0.0, 1.0);
        Color::from_hsv(hsv)
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.0 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// CIEDE2000 color difference. Around 2.3 is the just-noticeable difference.
    pub fn delta_e(c1: &Color, c2: &Color) -> f32 {
        c1.to_lab().difference(c2.to_lab()).abs()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s.trim())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::BLACK;
    const WHITE: Color = Color::WHITE;

    #[test]
    fn hex_round_trip() {
        let original = Color::from_hex("#ff8800").unwrap();
        assert_eq!(original.r, 255);
        assert_eq!(original.g, 136);
        assert_eq!(original.b, 0);
        assert_eq!(original.to_hex(), "#ff8800");
    }

    #[test]
    fn hex_uppercase_input() {
        let color = Color::from_hex("#FF8800").unwrap();
        assert_eq!(color.to_hex(), "#ff8800");
    }

    #[test]
    fn hex_without_hash() {
        let color = Color::from_hex("aabbcc").unwrap();
        assert_eq!(color.to_hex(), "#aabbcc");
    }

    #[test]
    fn hex_short_form_expands() {
        assert_eq!(Color::from_hex("#f80").unwrap(), Color::new(255, 136, 0));
        assert_eq!(Color::from_hex("fff").unwrap(), WHITE);
    }

    #[test]
    fn hex_invalid_length() {
        assert_eq!(
            Color::from_hex("#ffff"),
            Err(ParseColorError::InvalidLength(4))
        );
        assert_eq!(Color::from_hex(""), Err(ParseColorError::InvalidLength(0)));
    }

    #[test]
    fn hex_invalid_chars() {
        assert_eq!(
            Color::from_hex("#gggggg"),
            Err(ParseColorError::InvalidDigit('g'))
        );
        assert!(Color::from_hex("#ffé").is_err());
    }

    #[test]
    fn from_str_trims_whitespace() {
        let color: Color = "  #00ff00 ".parse().unwrap();
        assert_eq!(color, Color::new(0, 255, 0));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::new(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str("\"#0102FF\"").unwrap();
        assert_eq!(back, Color::new(1, 2, 255));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn srgb_to_lab_round_trip() {
        let colors = [
            Color::new(200, 100, 50),
            Color::new(0, 255, 0),
            Color::new(128, 128, 128),
            BLACK,
            WHITE,
        ];
        for original in colors {
            let recovered = Color::from_lab(original.to_lab());
            assert!(
                (original.r as i16 - recovered.r as i16).unsigned_abs() <= 1
                    && (original.g as i16 - recovered.g as i16).unsigned_abs() <= 1
                    && (original.b as i16 - recovered.b as i16).unsigned_abs() <= 1,
                "Lab round trip drifted for {original}: got {recovered}"
            );
        }
    }

    #[test]
    fn srgb_to_hsv_round_trip() {
        let colors = [
            Color::new(200, 100, 50),
            Color::new(12, 34, 56),
            Color::new(128, 128, 128),
            WHITE,
        ];
        for original in colors {
            let recovered = Color::from_hsv(original.to_hsv());
            assert!(
                (original.r as i16 - recovered.r as i16).unsigned_abs() <= 1
                    && (original.g as i16 - recovered.g as i16).unsigned_abs() <= 1
                    && (original.b as i16 - recovered.b as i16).unsigned_abs() <= 1,
                "HSV round trip drifted for {original}: got {recovered}"
            );
        }
    }

    #[test]
    fn complement_of_red_is_cyan() {
        let red = Color::new(255, 0, 0);
        assert_eq!(red.shift_hue(180.0), Color::new(0, 255, 255));
    }

    #[test]
    fn quarter_turn_of_red_is_chartreuse() {
        let shifted = Color::new(255, 0, 0).shift_hue(90.0);
        assert!(shifted.r >= 127 && shifted.r <= 128, "got {shifted}");
        assert_eq!(shifted.g, 255);
        assert_eq!(shifted.b, 0);
    }

    #[test]
    fn hue_shift_leaves_grays_alone() {
        let gray = Color::new(128, 128, 128);
        assert_eq!(gray.shift_hue(180.0), gray);
    }

    #[test]
    fn adjust_value_moves_brightness() {
        let color = Color::new(100, 50, 150);
        let darker = color.adjust_value(-0.3);
        let brighter = color.adjust_value(0.3);
        assert!(darker.relative_luminance() < color.relative_luminance());
        assert!(brighter.relative_luminance() > color.relative_luminance());
    }

    #[test]
    fn adjust_value_clamps() {
        assert_eq!(WHITE.adjust_value(1.0), WHITE);
        assert_eq!(WHITE.adjust_value(-2.0), BLACK);
    }

    #[test]
    fn contrast_ratio_black_white() {
        let ratio = Color::contrast_ratio(&BLACK, &WHITE);
        assert!(
            (ratio - 21.0).abs() < 0.1,
            "black/white contrast should be ~21:1, got {ratio}"
        );
    }

    #[test]
    fn contrast_ratio_same_color() {
        let gray = Color::new(128, 128, 128);
        let ratio = Color::contrast_ratio(&gray, &gray);
        assert!(
            (ratio - 1.0).abs() < 0.001,
            "same color contrast should be 1:1, got {ratio}"
        );
    }

    #[test]
    fn contrast_ratio_is_symmetric() {
        let a = Color::new(200, 50, 50);
        let b = Color::new(50, 200, 50);
        let ratio_ab = Color::contrast_ratio(&a, &b);
        let ratio_ba = Color::contrast_ratio(&b, &a);
        assert!(
            (ratio_ab - ratio_ba).abs() < 0.001,
            "contrast ratio should be symmetric: {ratio_ab} vs {ratio_ba}"
        );
    }

    #[test]
    fn contrast_ratio_mid_gray_vs_black() {
        // sRGB(119,119,119) has relative luminance ~0.184
        let gray = Color::new(119, 119, 119);
        let ratio = Color::contrast_ratio(&gray, &BLACK);
        assert!(
            ratio > 4.5 && ratio < 5.0,
            "mid-gray vs black should be ~4.7:1, got {ratio}"
        );
    }

    #[test]
    fn relative_luminance_extremes() {
        assert!(BLACK.relative_luminance() < 0.001);
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }

    #[test]
    fn delta_e_identical_is_zero() {
        let c = Color::new(30, 144, 255);
        assert!(Color::delta_e(&c, &c) < 0.01);
    }

    #[test]
    fn delta_e_orders_by_similarity() {
        let red = Color::new(220, 30, 30);
        let near = Color::new(215, 35, 32);
        let far = Color::new(30, 30, 220);
        assert!(Color::delta_e(&red, &near) < 2.3);
        assert!(Color::delta_e(&red, &far) > Color::delta_e(&red, &near));
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }
}
