//! Questline CLI entry point.

use clap::Parser;

use questline::cli::{Cli, Commands};
use questline::infrastructure::logging::LoggerImpl;
use questline::{Config, ConfigLoader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging follows the config; a broken config still gets default logging
    // so the load error itself is reported by the command.
    let logging = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .map(|config| config.logging)
    .unwrap_or_else(|_| Config::default().logging);
    let _logger = LoggerImpl::init(&logging).ok();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Init(args) => questline::cli::commands::init::execute(args, cli.json).await,
        Commands::Quest(args) => questline::cli::commands::quest::execute(args, config_path, cli.json).await,
        Commands::Xp(args) => questline::cli::commands::xp::execute(args, config_path, cli.json).await,
        Commands::Activity(args) => {
            questline::cli::commands::activity::execute(args, config_path, cli.json).await
        }
        Commands::Evaluate(args) => {
            questline::cli::commands::evaluate::execute(args, config_path, cli.json).await
        }
    };

    if let Err(err) = result {
        questline::cli::handle_error(err, cli.json);
    }
}
