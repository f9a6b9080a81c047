pub mod css;
pub mod json;
pub mod scss;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::OutputFormat;
use crate::report::PaletteReport;

pub use css::CssBackend;
pub use json::JsonBackend;
pub use scss::ScssBackend;

/// A stylesheet format the palette can be exported to.
pub trait StyleBackend {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &str;

    /// Render the report in this backend's format.
    fn serialize(&self, report: &PaletteReport) -> Result<String>;

    /// Write the rendered report to `path`.
    fn write_to(&self, report: &PaletteReport, path: &Path) -> Result<()> {
        let content = self.serialize(report)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {} to {}", self.name(), path.display()))?;
        info!(path = %path.display(), backend = self.name(), "wrote stylesheet");
        Ok(())
    }
}

pub fn backend_for(format: OutputFormat) -> Box<dyn StyleBackend> {
    match format {
        OutputFormat::Scss => Box::new(ScssBackend),
        OutputFormat::Css => Box::new(CssBackend),
        OutputFormat::Json => Box::new(JsonBackend),
    }
}
