use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use canvas_framer::{
    composition::CompositionEngine,
    config::{self, loader::DIAGNOSTICS_TARGET, DEFAULT_CONFIG_PATH},
    CompositorError,
};

#[derive(Parser)]
#[command(
    name = "canvas-framer",
    version,
    about = "Batch-resize images and composite them onto a colored canvas",
    long_about = "Canvas-Framer scales every input image to a configured width, draws it onto a fixed-size background frame at a configured offset, and writes the result. Settings are read from a YAML file merged over built-in defaults."
)]
struct Cli {
    /// YAML configuration file; ignored unless it exists and ends in .yaml/.yml
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose, except that
    // the loaded/effective config diagnostics are always shown
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive(format!("{}=info", DIAGNOSTICS_TARGET).parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Canvas-Framer v{}", env!("CARGO_PKG_VERSION"));
    info!("Config: {:?}", cli.config);

    run(&cli).map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn run(cli: &Cli) -> std::result::Result<(), CompositorError> {
    let config = config::load_config(&cli.config)?;
    config.validate()?;

    let engine = CompositionEngine::new(config);
    let report = engine.run()?;

    info!("Done! {} image(s) saved under {:?}", report.len(), engine.config().output);
    Ok(())
}
