use anyhow::{Context, Result};

use crate::report::PaletteReport;

use super::StyleBackend;

/// The full report as pretty-printed JSON.
pub struct JsonBackend;

impl StyleBackend for JsonBackend {
    fn name(&self) -> &str {
        "JSON"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, report: &PaletteReport) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(report).context("failed to serialize palette report")?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::{mapped_report, report};
    use serde_json::Value;

    #[test]
    fn output_is_valid_json_with_all_sections() {
        let output = JsonBackend.serialize(&mapped_report()).unwrap();
        assert!(output.ends_with("}\n"));

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["source"], "logo.png");
        assert_eq!(value["palette"]["primary"], "#ff0000");
        assert_eq!(value["dominant"].as_array().unwrap().len(), 2);
        assert_eq!(value["contrast"].as_array().unwrap().len(), 8);
        assert_eq!(value["variables"][0]["status"], "reuse");
        assert_eq!(value["variables"][0]["nearest"]["name"], "brand-red");
    }

    #[test]
    fn contrast_entries_carry_ratings() {
        let output = JsonBackend.serialize(&report()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        for check in value["contrast"].as_array().unwrap() {
            let rating = check["rating"].as_str().unwrap();
            assert!(["good", "acceptable", "insufficient"].contains(&rating));
            assert!(check["ratio"].as_f64().unwrap() >= 1.0);
        }
    }
}
