//! This is the main entry point for rpatch.

use std::process::ExitCode;

use clap::Parser;
use rpatch::cli::Cli;

fn main() -> ExitCode {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();

    let cli = Cli::parse();
    if let Some(dir) = &cli.directory
        && let Err(e) = std::env::set_current_dir(dir)
    {
        eprintln!("rpatch: cannot change directory to {}: {e}", dir.display());
        return ExitCode::from(2);
    }
    let settings = cli.settings();
    match rpatch::engine::run(&settings, cli.patchfile.as_deref()) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("rpatch: {e}");
            ExitCode::from(2)
        }
    }
}
