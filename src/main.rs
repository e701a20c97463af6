use colored::*;
use std::process::ExitCode;
use suite_runner::{cli, models::EXIT_CONFIG_ERROR};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments and process the command
    match cli::run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}
