use std::path::Path;

use {
    anyhow::Result,
    kyron_config::{Severity, ValidationResult},
};

use crate::relay_commands::{diagnose, resolve_config_path};

const RESET: &str = "\x1b[0m";

/// Bold ANSI color for a diagnostic line.
fn severity_style(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[1;31m",
        Severity::Warning => "\x1b[1;33m",
        Severity::Info => "\x1b[1;36m",
    }
}

/// One colored line per diagnostic; info lines only when `verbose`.
fn render_lines(result: &ValidationResult, verbose: bool) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
        .map(|d| format!("  {}{d}{RESET}", severity_style(d.severity)))
        .collect()
}

/// Validate the effective configuration and print diagnostics.
///
/// Exits non-zero when any error is found.
pub fn handle_check(config: Option<&Path>, ci_mode: bool, verbose: bool) -> Result<()> {
    let config_path = resolve_config_path(config);
    match &config_path {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let loaded = kyron_config::discover_and_load(config_path.as_deref())?;
    let result = diagnose(config_path.as_deref(), &loaded, ci_mode)?;

    let lines = render_lines(&result, verbose);
    for line in &lines {
        eprintln!("{line}");
    }
    if !lines.is_empty() {
        eprintln!();
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    match (errors, warnings) {
        (0, 0) => eprintln!("No issues found."),
        _ => eprintln!("{errors} error(s), {warnings} warning(s)"),
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
