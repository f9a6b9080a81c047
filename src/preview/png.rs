use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use tracing::info;

use crate::color::Color;
use crate::pipeline::contrast::readable_text;
use crate::pipeline::generate::DesignPalette;

const SWATCH_WIDTH: u32 = 80;
const SWATCH_HEIGHT: u32 = 200;
const GUTTER: u32 = 8;
const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
/// Labels are drawn at the largest scale that fits the swatch, up to this one.
const MAX_LABEL_SCALE: u32 = 3;
const LABEL_INSET: u32 = 4;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

fn rgb(color: Color) -> Rgb<u8> {
    Rgb([color.r, color.g, color.b])
}

/// 3x5 bitmap for the characters that appear in role names. Bit 2 is the
/// leftmost column; unknown characters render blank.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        'a' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'g' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'p' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b011, 0b100, 0b010, 0b001, 0b110],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'w' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => [0; 5],
    }
}

/// Placement of a label inside its swatch: `(left, top, scale)`.
fn label_layout(text: &str) -> (u32, u32, u32) {
    let chars = text.chars().count() as u32;
    // one column of spacing between glyphs
    let columns = (chars * (GLYPH_WIDTH + 1)).saturating_sub(1);
    let available = SWATCH_WIDTH - 2 * LABEL_INSET;
    let scale = (1..=MAX_LABEL_SCALE)
        .rev()
        .find(|scale| columns * scale <= available)
        .unwrap_or(1);
    let left = SWATCH_WIDTH.saturating_sub(columns * scale) / 2;
    let top = (SWATCH_HEIGHT - GLYPH_HEIGHT * scale) / 2;
    (left, top, scale)
}

/// Whether the label covers pixel `(x, y)` of its swatch.
fn label_covers(text: &str, x: u32, y: u32) -> bool {
    let (left, top, scale) = label_layout(text);
    if x < left || y < top {
        return false;
    }
    let (col, row) = ((x - left) / scale, (y - top) / scale);
    if row >= GLYPH_HEIGHT {
        return false;
    }
    let (index, within) = (col / (GLYPH_WIDTH + 1), col % (GLYPH_WIDTH + 1));
    if within == GLYPH_WIDTH {
        return false;
    }
    text.chars()
        .nth(index as usize)
        .is_some_and(|c| glyph(c)[row as usize] & (0b100 >> within) != 0)
}

/// Draw one vertical bar per palette role, left to right in canonical order.
///
/// Each bar is labelled with its role name in the readable text color.
pub fn render_swatches(palette: &DesignPalette) -> RgbImage {
    let entries = palette.entries();
    let count = entries.len() as u32;
    let width = count * SWATCH_WIDTH + (count + 1) * GUTTER;
    let height = SWATCH_HEIGHT + 2 * GUTTER;
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    for (i, (role, color)) in entries.iter().enumerate() {
        let x0 = GUTTER + i as u32 * (SWATCH_WIDTH + GUTTER);
        let fill = rgb(*color);
        let ink = rgb(readable_text(palette, *color));

        for y in 0..SWATCH_HEIGHT {
            for x in 0..SWATCH_WIDTH {
                let pixel = if label_covers(role, x, y) { ink } else { fill };
                img.put_pixel(x0 + x, GUTTER + y, pixel);
            }
        }
    }

    img
}

/// Render the swatches and save them; the format follows the file extension.
pub fn save_preview(palette: &DesignPalette, path: &Path) -> Result<()> {
    render_swatches(palette)
        .save(path)
        .with_context(|| format!("failed to save preview to {}", path.display()))?;
    info!(path = %path.display(), "wrote palette preview");
    Ok(())
}
