use std::io::{self, Write};

use crossterm::style::{self, Stylize};

use crate::color::Color;
use crate::pipeline::contrast::{readable_text, ContrastCheck};
use crate::report::PaletteReport;

fn term_color(c: Color) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Print one line per palette role: a 24-bit swatch with the role name in its
/// readable text color, the hex value, and contrast against both text grays.
pub fn render(report: &PaletteReport, out: &mut impl Write) -> io::Result<()> {
    let palette = &report.palette;
    writeln!(out, "Palette from {}", report.source)?;
    for (role, color) in palette.entries() {
        let swatch = style::style(format!(" {role:^15} "))
            .with(term_color(readable_text(palette, color)))
            .on(term_color(color));
        let on_light = Color::contrast_ratio(&palette.gray_light, &color);
        let on_dark = Color::contrast_ratio(&palette.gray_dark, &color);
        writeln!(
            out,
            "  {swatch} {color}  light text {on_light:>5.2}:1  dark text {on_dark:>5.2}:1"
        )?;
    }
    Ok(())
}

/// Print the contrast checks as a plain list.
pub fn render_contrast(checks: &[ContrastCheck], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Contrast (WCAG 2.0):")?;
    for check in checks {
        writeln!(out, "  {check}")?;
    }
    Ok(())
}
