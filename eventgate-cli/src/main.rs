use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use eventgate_cli::cli::{Cli, Commands};
use eventgate_cli::commands;
use eventgate_cli::error::CliError;
use eventgate_cli::logging;
use eventgate_cli::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            eprintln!("error: {e:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = commands::load_config(cli.config.as_deref()).await?;
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
        config.validate().map_err(CliError::from)?;
    }

    logging::init_tracing(&config.general)?;
    eventgate_core::metrics::describe_all();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "eventgate starting");

    // Ctrl-C 수신 시 스트림 처리와 빌드를 중단
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    match cli.command {
        Commands::Run(args) => {
            commands::run::execute(args, &config, cancel).await?;
        }
        Commands::Check => {
            let writer = OutputWriter::new(cli.output);
            commands::check::execute(&config, cli.config.as_deref(), &writer, &cancel)?;
        }
    }

    Ok(())
}
