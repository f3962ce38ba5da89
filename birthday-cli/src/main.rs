use std::path::PathBuf;

use anyhow::{Context, Result};
use birthday_core::ConverterConfig;
use birthday_core::loader::load_records;
use birthday_core::writer::write_calendar;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "birthday-notify")]
#[command(about = "Turn a contacts birthday calendar into yearly notification events")]
struct Cli {
    /// Contacts calendar to read (defaults to data/ next to the executable)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Calendar file to write (overwritten if it exists)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/birthday-notify/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "birthday_core=debug" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref())?;

    let mut config =
        ConverterConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(input) = cli.input {
        config = config.with_input(input);
    }
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    tracing::debug!(config = ?config, "Configuration loaded");

    let records = load_records(&config.input, &config.loader_options())
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    write_calendar(&records, &config.calendar, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    Ok(())
}

/// Log to stderr with level, file and line. `--log-level` wins over RUST_LOG,
/// otherwise everything down to debug is shown.
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(())
}
