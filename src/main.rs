use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logo_palette::backends::backend_for;
use logo_palette::cli::{Args, OutputFormat};
use logo_palette::config::Config;
use logo_palette::pipeline::mapping::load_scss_variables;
use logo_palette::preview;
use logo_palette::report::PaletteReport;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_args(&args);
    config.validate()?;

    let existing = args
        .existing
        .as_deref()
        .map(load_scss_variables)
        .transpose()?;

    let report = PaletteReport::build(
        &args.image,
        &config,
        existing.as_deref(),
        !args.no_contrast,
    )?;

    let backend = backend_for(config.format);
    match &args.output {
        Some(path) => {
            backend.write_to(&report, path)?;
            eprintln!("Wrote {} palette to {}", backend.name(), path.display());
        }
        None => {
            let content = backend.serialize(&report)?;
            io::stdout()
                .write_all(content.as_bytes())
                .context("failed to write to stdout")?;
        }
    }

    let mut stderr = io::stderr().lock();
    if config.format != OutputFormat::Json {
        if let Some(checks) = &report.contrast {
            preview::terminal::render_contrast(checks, &mut stderr)?;
        }
    }
    if args.preview {
        preview::terminal::render(&report, &mut stderr)?;
    }
    if let Some(path) = &args.preview_image {
        preview::png::save_preview(&report.palette, path)?;
        eprintln!("Saved palette preview to {}", path.display());
    }

    info!(source = %report.source, roles = report.palette.entries().len(), "done");
    Ok(())
}

/// Log to stderr so stdout stays reserved for the stylesheet.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}
