//! Configuration validation.
//!
//! Detects unknown/misspelled fields in config files and checks the loaded
//! config for missing secrets, unresolved webhooks and bad rewrite patterns.

use std::collections::HashMap;

use {secrecy::ExposeSecret, serde_json::Value};

use crate::{env_subst::is_unresolved, schema::RelayConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "unknown-field", "missing-secret", "missing-webhook",
    /// "invalid-channel-id", "webhook-url", "invalid-pattern",
    /// "overlapping-channel-ids", "reconnect"
    pub category: &'static str,
    /// Dotted path, e.g. "channels.1455072323437723790"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} [{}] {}", self.severity, self.category, self.message)
        } else {
            write!(
                f,
                "{} [{}] {}: {}",
                self.severity, self.category, self.path, self.message
            )
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Unknown-field detection ─────────────────────────────────────────────────

const TOP_LEVEL_KEYS: &[&str] = &[
    "token",
    "reconnect_delay_secs",
    "channels",
    "rewrite",
    "branding",
    "liveness",
];

fn section_keys() -> HashMap<&'static str, &'static [&'static str]> {
    HashMap::from([
        ("rewrite", &["rules"][..]),
        (
            "branding",
            &["username", "footer_text", "footer_icon_url", "default_color"][..],
        ),
        ("liveness", &["enabled", "bind", "port"][..]),
    ])
}

const RULE_KEYS: &[&str] = &["pattern", "replacement"];

/// Flag keys in a raw config document that the schema does not know.
///
/// `raw` is the parsed document in any supported format, as JSON.
#[must_use]
pub fn check_unknown_fields(raw: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();
    let Some(root) = raw.as_object() else {
        return result;
    };
    let sections = section_keys();

    for (key, value) in root {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            push_unknown(&mut result, key, key, TOP_LEVEL_KEYS);
            continue;
        }
        if let (Some(known), Some(table)) = (sections.get(key.as_str()), value.as_object()) {
            for child in table.keys() {
                if !known.contains(&child.as_str()) {
                    push_unknown(&mut result, &format!("{key}.{child}"), child, known);
                }
            }
        }
    }

    if let Some(rules) = raw.pointer("/rewrite/rules").and_then(Value::as_array) {
        for (i, rule) in rules.iter().enumerate() {
            for child in rule.as_object().into_iter().flat_map(|o| o.keys()) {
                if !RULE_KEYS.contains(&child.as_str()) {
                    push_unknown(
                        &mut result,
                        &format!("rewrite.rules[{i}].{child}"),
                        child,
                        RULE_KEYS,
                    );
                }
            }
        }
    }

    result
}

fn push_unknown(result: &mut ValidationResult, path: &str, key: &str, candidates: &[&str]) {
    let message = match suggest(key, candidates, 3) {
        Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
        None => "unknown field".to_string(),
    };
    result.push(Severity::Warning, "unknown-field", path, message);
}

/// Levenshtein distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Semantic checks ─────────────────────────────────────────────────────────

/// Check a loaded config (after env substitution).
///
/// In CI mode missing webhooks are warnings instead of errors; the caller
/// drops those channels via [`resolved_channels`].
#[must_use]
pub fn validate_config(config: &RelayConfig, ci_mode: bool) -> ValidationResult {
    let mut result = ValidationResult::default();

    if is_unresolved(config.token.expose_secret()) {
        result.push(
            Severity::Error,
            "missing-secret",
            "token",
            "Discord token not found (set DISCORD_TOKEN)",
        );
    }

    if config.channels.is_empty() {
        result.push(
            Severity::Warning,
            "missing-webhook",
            "channels",
            "no channels configured; nothing will be relayed",
        );
    }

    let webhook_severity = if ci_mode {
        Severity::Warning
    } else {
        Severity::Error
    };
    let mut ids = Vec::with_capacity(config.channels.len());
    for (id, webhook) in &config.channels {
        let path = format!("channels.{id}");
        match id.parse::<u64>() {
            Ok(parsed) => ids.push(parsed),
            Err(_) => {
                result.push(
                    Severity::Error,
                    "invalid-channel-id",
                    path,
                    format!("channel ID {id:?} is not a numeric snowflake"),
                );
                continue;
            },
        }
        if is_unresolved(webhook) {
            result.push(
                webhook_severity,
                "missing-webhook",
                path,
                format!("webhook for channel {id} not found"),
            );
        } else if !(webhook.starts_with("https://") || webhook.starts_with("http://")) {
            result.push(
                Severity::Warning,
                "webhook-url",
                path,
                "webhook URL is not http(s)",
            );
        }
    }

    for (i, (a, b)) in overlapping_ids(&ids).into_iter().enumerate() {
        result.push(
            Severity::Info,
            "overlapping-channel-ids",
            format!("channels[{i}]"),
            format!("{a} and {b} share digits; partial matching may confuse them"),
        );
    }

    for (i, rule) in config.rewrite.rules.iter().enumerate() {
        if let Err(e) = kyron_rewrite::Rewriter::new([(&rule.pattern, rule.replacement.as_str())])
        {
            result.push(
                Severity::Error,
                "invalid-pattern",
                format!("rewrite.rules[{i}].pattern"),
                e.to_string(),
            );
        }
    }

    if config.reconnect_delay_secs == 0 {
        result.push(
            Severity::Warning,
            "reconnect",
            "reconnect_delay_secs",
            "zero delay reconnects in a tight loop",
        );
    }

    result
}

/// Pairs of configured IDs where one decimal form contains the other.
fn overlapping_ids(ids: &[u64]) -> Vec<(u64, u64)> {
    let strings: Vec<String> = ids.iter().map(u64::to_string).collect();
    let mut pairs = Vec::new();
    for (i, a) in strings.iter().enumerate() {
        for (j, b) in strings.iter().enumerate().skip(i + 1) {
            if a != b && (a.contains(b.as_str()) || b.contains(a.as_str())) {
                pairs.push((ids[i], ids[j]));
            }
        }
    }
    pairs
}

/// Channel entries that parse and carry a resolved webhook, in order.
#[must_use]
pub fn resolved_channels(config: &RelayConfig) -> Vec<(u64, String)> {
    config
        .channels
        .iter()
        .filter(|(_, webhook)| !is_unresolved(webhook))
        .filter_map(|(id, webhook)| Some((id.parse().ok()?, webhook.clone())))
        .collect()
}
