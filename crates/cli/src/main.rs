mod check_commands;
mod relay_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand, builder::FalseyValueParser},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use crate::relay_commands::RunOptions;

#[derive(Parser)]
#[command(name = "kyron", about = "Kyron: Discord channel relay", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./kyron.toml and ~/.config/kyron/).
    #[arg(long, global = true, env = "KYRON_CONFIG")]
    config: Option<PathBuf>,

    /// Soft validation: missing webhooks warn instead of failing, and the
    /// liveness endpoint is not started.
    #[arg(long, global = true, env = "GITHUB_ACTIONS", value_parser = FalseyValueParser::new())]
    ci: bool,

    /// Liveness endpoint port (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Do not start the liveness endpoint.
    #[arg(long, global = true, default_value_t = false)]
    no_liveness: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay (default when no subcommand is provided).
    Run,
    /// Validate the configuration and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print `text` after normalization and the configured rewrite rules.
    Rewrite { text: String },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn handle_rewrite(config: Option<PathBuf>, text: &str) -> anyhow::Result<()> {
    let config_path = relay_commands::resolve_config_path(config.as_deref());
    let config = kyron_config::discover_and_load(config_path.as_deref())?;
    let ctx = relay_commands::build_context(&config)?;
    println!("{}", ctx.rewriter.rewrite(text));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        None | Some(Commands::Run) => {
            info!(version = env!("CARGO_PKG_VERSION"), "kyron starting");
            relay_commands::handle_run(RunOptions {
                config_path: cli.config,
                ci_mode: cli.ci,
                port: cli.port,
                no_liveness: cli.no_liveness,
            })
            .await
        },
        Some(Commands::Check { verbose }) => {
            check_commands::handle_check(cli.config.as_deref(), cli.ci, verbose)
        },
        Some(Commands::Rewrite { text }) => handle_rewrite(cli.config, &text),
    }
}
