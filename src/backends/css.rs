use anyhow::Result;

use crate::report::PaletteReport;

use super::StyleBackend;

/// CSS custom properties on `:root`.
pub struct CssBackend;

impl StyleBackend for CssBackend {
    fn name(&self) -> &str {
        "CSS"
    }

    fn extension(&self) -> &str {
        "css"
    }

    fn serialize(&self, report: &PaletteReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!(
            "/* Design system colors generated from {} */\n",
            report.source
        ));
        out.push_str(":root {\n");

        for (role, color) in report.palette.entries() {
            let name = report.variable_name(&role);
            match report.variable_for(&role).and_then(|m| m.reused()) {
                Some(existing) => out.push_str(&format!(
                    "  --{name}: {color}; /* matches ${} */\n",
                    existing.name
                )),
                None => out.push_str(&format!("  --{name}: {color};\n")),
            }
        }

        out.push_str("}\n");
        Ok(out)
    }
}
