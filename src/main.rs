use clap::Parser;
use extsort::cli::{Cli, run_cli};

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::trace!("CLI arguments: {:?}", cli);

    std::process::exit(run_cli(&cli));
}
