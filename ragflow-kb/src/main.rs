use clap::Parser;
use ragflow_kb::cli::{run, Cli};
use ragflow_kb_core::KbError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    // stdout carries the rendering, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            if let Some(KbError::NotFound(_)) = e.downcast_ref::<KbError>() {
                eprintln!("Hint: run with --list-kbs to see available knowledge bases");
            }
            ExitCode::FAILURE
        }
    }
}
