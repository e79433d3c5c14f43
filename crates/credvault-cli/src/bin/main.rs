//! credvault CLI - master key setup and secret verification
//!
//! The master key lives in the OS keychain. Secrets are never accepted as
//! command line arguments; they are read from the terminal without echo.

use clap::Parser;

use credvault_cli::build_key_manager;
use credvault_cli::cli::{self, Args};
use credvault_core::SettingsManager;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let outcome = execute(args).await;
    if let Err(e) = &outcome {
        eprintln!("Error: {}", e);
    }
    std::process::exit(cli::exit_code(&outcome));
}

async fn execute(args: Args) -> credvault_cli::Result<i32> {
    let settings_dir = match args.settings_dir {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    let settings = SettingsManager::new(&settings_dir);
    let backend = args.backend.unwrap_or(settings.get().store_backend);

    let manager = build_key_manager(settings.get(), backend).await?;

    let command = args.command;
    tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        cli::run(
            &manager,
            command,
            |prompt: &str| rpassword::prompt_password(prompt),
            &mut out,
        )
    })
    .await?
}
