use clap::Parser;
use tracing_subscriber::EnvFilter;

use lapdelta::config::Cli;

// Parses the command line and hands over to the library.
// Returning the error from main gives a non-zero exit code for malformed input.
fn main() -> anyhow::Result<()> {
    // logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    lapdelta::run(&cli, &mut stdout.lock())
}
