use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use search_index_cli::{commands, logging, Cli, Dependencies};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.log_format);

    let dependencies = match Dependencies::new(&cli.connection) {
        Ok(dependencies) => dependencies,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(cli.command, &dependencies.client).await {
        Ok(status) => {
            println!("{}", status);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, status_code = status_code(&e), "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn status_code(err: &search_index_cli::CliError) -> u16 {
    match err {
        search_index_cli::CliError::SearchError(e) => e.status_code(),
        _ => 0,
    }
}
