use anyhow::{Context, Result};
use clap::Parser;
use querystat::{
    analyze,
    cli::Cli,
    config::{ConfigFile, Settings},
    report,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };

    let kind = analyze::detect_kind(&args.input, args.kind)?;
    let settings = Settings::resolve(analyze::default_report_options(kind), &config, &args)?;

    let stats = analyze::analyze_input(&args.input, kind, &settings.marker)
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    print!("{}", report::render(&stats, &settings.report));

    Ok(())
}
