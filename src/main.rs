use std::process::ExitCode;

use clap::Parser;
use waybill::adapter::inbound::cli::command::Cli;
use waybill::adapter::inbound::cli::dispatch::execute;
use waybill::adapter::inbound::cli::output;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
