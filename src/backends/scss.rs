use anyhow::Result;

use crate::report::PaletteReport;

use super::StyleBackend;

/// Sass variables, one `$prefix-role` per palette role.
pub struct ScssBackend;

impl StyleBackend for ScssBackend {
    fn name(&self) -> &str {
        "SCSS"
    }

    fn extension(&self) -> &str {
        "scss"
    }

    fn serialize(&self, report: &PaletteReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!(
            "// Design system colors generated from {}\n\n",
            report.source
        ));

        for (role, color) in report.palette.entries() {
            let name = report.variable_name(&role);
            match report.variable_for(&role).and_then(|m| m.reused()) {
                Some(existing) => out.push_str(&format!(
                    "${name}: ${}; // {color}, delta-e {:.2}\n",
                    existing.name, existing.delta_e
                )),
                None => out.push_str(&format!("${name}: {color};\n")),
            }
        }

        Ok(out)
    }
}
