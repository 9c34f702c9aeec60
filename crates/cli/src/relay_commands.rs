use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use {
    anyhow::Result,
    kyron_config::{RelayConfig, Severity, ValidationResult},
    kyron_discord::DiscordSessionFactory,
    kyron_relay::{RelayContext, Supervisor},
    kyron_rewrite::Rewriter,
    kyron_routing::ChannelRouter,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

/// Startup options collected from the command line.
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub ci_mode: bool,
    pub port: Option<u16>,
    pub no_liveness: bool,
}

/// Config file actually in effect: the explicit one, else the discovered one.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(kyron_config::find_config_file)
}

/// Unknown-field checks on the raw file plus semantic checks on the loaded
/// config.
pub fn diagnose(
    config_path: Option<&Path>,
    config: &RelayConfig,
    ci_mode: bool,
) -> Result<ValidationResult> {
    let mut result = match config_path {
        Some(path) => {
            kyron_config::check_unknown_fields(&kyron_config::load_config_value(path)?)
        },
        None => ValidationResult::default(),
    };
    result
        .diagnostics
        .extend(kyron_config::validate_config(config, ci_mode).diagnostics);
    Ok(result)
}

/// Compile the shared, read-only relay state from a validated config.
///
/// Channels whose webhook is still unresolved are left out of the routing
/// table.
pub fn build_context(config: &RelayConfig) -> Result<RelayContext> {
    let router = ChannelRouter::new(kyron_config::resolved_channels(config))?;
    let rewriter = Rewriter::new(
        config
            .rewrite
            .rules
            .iter()
            .map(|rule| (rule.pattern.as_str(), rule.replacement.as_str())),
    )?;
    Ok(RelayContext {
        router: Arc::new(router),
        rewriter: Arc::new(rewriter),
        branding: Arc::new(config.branding.clone()),
    })
}

fn log_diagnostics(result: &ValidationResult) {
    for d in &result.diagnostics {
        match d.severity {
            Severity::Error => error!(category = d.category, path = %d.path, "{}", d.message),
            Severity::Warning => warn!(category = d.category, path = %d.path, "{}", d.message),
            Severity::Info => debug!(category = d.category, path = %d.path, "{}", d.message),
        }
    }
}

/// Validate, then run the relay until ctrl-c.
pub async fn handle_run(opts: RunOptions) -> Result<()> {
    let config_path = resolve_config_path(opts.config_path.as_deref());
    let mut config = kyron_config::discover_and_load(config_path.as_deref())?;
    if let Some(port) = opts.port {
        config.liveness.port = port;
    }

    let diagnostics = diagnose(config_path.as_deref(), &config, opts.ci_mode)?;
    log_diagnostics(&diagnostics);
    if diagnostics.has_errors() {
        anyhow::bail!(
            "configuration has {} error(s); run `kyron check` for details",
            diagnostics.count(Severity::Error)
        );
    }

    let ctx = build_context(&config)?;
    info!(
        channels = ctx.router.len(),
        rules = ctx.rewriter.len(),
        ci_mode = opts.ci_mode,
        "relay configured"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
            }
            cancel.cancel();
        }
    });

    let liveness = if opts.ci_mode || opts.no_liveness || !config.liveness.enabled {
        debug!("liveness endpoint not started");
        None
    } else {
        Some(kyron_liveness::spawn(&config.liveness, cancel.clone()))
    };

    let factory = DiscordSessionFactory::new(config.token.clone(), ctx);
    Supervisor::new(factory, Duration::from_secs(config.reconnect_delay_secs))
        .run(cancel)
        .await;

    if let Some(handle) = liveness {
        let _ = handle.await;
    }
    Ok(())
}
