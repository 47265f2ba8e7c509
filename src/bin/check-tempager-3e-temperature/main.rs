mod args;

use std::process::ExitCode;

use args::Args;
use check_tempager_3e_temperature::check::{self, CheckConfiguration};
use clap::Parser as _;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    let config = CheckConfiguration::from(args);

    let outcome = check::run(&config).await;
    println!("{}", outcome.status_line());

    outcome.severity.exit_code()
}

// stdout carries the check result, so logs go to stderr.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
