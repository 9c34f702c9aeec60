//! Configuration loading, validation, and env substitution.
//!
//! Config files: `kyron.toml`, `kyron.yaml`, or `kyron.json`
//! Searched in `./` then `~/.config/kyron/`. Built-in defaults otherwise.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        TOKEN_ENV, apply_env_overrides, config_dir, discover_and_load, find_config_file,
        load_config, load_config_value,
    },
    schema::{BrandingConfig, LivenessConfig, RelayConfig, RewriteConfig, RewriteRuleConfig},
    validate::{
        Diagnostic, Severity, ValidationResult, check_unknown_fields, resolved_channels,
        validate_config,
    },
};
