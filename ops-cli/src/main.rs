use clap::Parser;
use colored::Colorize;
use config_engine::ConfigLoader;
use error_common::{log_error, ErrorContext};
use logger_redacted::init_logging;
use ops_cli::{run, Cli};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ConfigLoader::new().with_file(&cli.config).load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::FAILURE;
        }
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Err(err) = init_logging(&config.logging) {
        eprintln!("{} {}", "warning:".yellow(), err);
    }

    let redactor = config.logging.redactor();
    match run(&cli, &config).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let context = ErrorContext::new().add_context("command", cli.command.name());
            log_error("signhex-authz", &err);
            debug!(context = %context.to_json(), "Command failed");
            eprintln!(
                "{} [{}] {}",
                "error:".red().bold(),
                err.code(),
                redactor.redact(&err.to_string())
            );
            ExitCode::FAILURE
        }
    }
}
