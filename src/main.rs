mod cli;
mod commands;
mod error_mapping;

use std::process::ExitCode;

use cli::Command;
use orbweather_core::{App, AppError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(e) = orbweather_core::init() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), AppError> {
    let mut app = App::new(cli.config.as_deref())?;
    tracing::info!("orbweather started");

    let result = match cli.command {
        Command::Show { city, watch } => commands::show(app.config(), city, watch).await,
        Command::Search { query, pick } => commands::search(app.config(), &query, pick).await,
        Command::Orb(args) => commands::orb(app.config(), args).await,
    };

    app.shutdown()?;
    result
}
