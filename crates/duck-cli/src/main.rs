use clap::Parser;
use duck_cli::{
    cli::{Cli, Commands},
    config::load_config,
    manifest,
};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let level = cli
        .log_level
        .or_else(|| config.as_ref().ok().and_then(|c| c.log_level().ok()))
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {err}");
    }

    let result = config.and_then(|config| match &cli.command {
        Commands::Run(args) => commands::run::handle(args, config),
        Commands::Config { command } => commands::config::handle(command, &config),
    });

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
