use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use drawbrain::adapter::inbound::cli::command::{Cli, Commands};
use drawbrain::adapter::inbound::cli::output::{self, OutputConfig};
use drawbrain::adapter::inbound::cli::{operator, performance, run, strategy, tickets};
use drawbrain::infrastructure::config::settings::Config;
use drawbrain::infrastructure::operator::ConfigOperator;

const DEFAULT_CONFIG: &str = "config.toml";

/// Grace period for blocking strategy threads still running at exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Config::load(DEFAULT_CONFIG).context("failed to load config.toml")
        }
        None => Config::parse_toml("").context("invalid default configuration"),
    }
}

async fn dispatch(command: &Commands) -> drawbrain::error::Result<()> {
    match command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Sync(args) => run::sync(args).await,
        Commands::Tickets(args) => tickets::execute(args).await,
        Commands::Performance => performance::execute().await,
        Commands::Strategies => strategy::list(),
    }
}

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;
    let result = runtime.block_on(cli_main());
    // A strategy that outlived its timeout must not hold the process open.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn cli_main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::error(&format!("{e:#}"));
            std::process::exit(2);
        }
    };
    config.init_logging();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    debug!(
        config = %config_path.display(),
        database = %config.database,
        "drawbrain starting"
    );

    if operator::install(Box::new(ConfigOperator::new(config))).is_err() {
        anyhow::bail!("CLI operator installed twice");
    }

    if let Err(e) = dispatch(&cli.command).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
