use std::path::{Path, PathBuf};

use {secrecy::ExposeSecret, serde::de::DeserializeOwned, tracing::debug};

use crate::{
    env_subst::{substitute_env, substitute_env_with},
    schema::RelayConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["kyron.toml", "kyron.yaml", "kyron.yml", "kyron.json"];

/// Environment variable that overrides the configured token.
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<RelayConfig> {
    let format = ConfigFormat::from_path(path)?;
    format.parse(&substitute_env(&read_config(path)?))
}

/// Load a config file as a raw JSON value (for unknown-field checks).
pub fn load_config_value(path: &Path) -> anyhow::Result<serde_json::Value> {
    let format = ConfigFormat::from_path(path)?;
    format.parse(&read_config(path)?)
}

fn read_config(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))
}

/// On-disk config syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Files without an extension are read as TOML.
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some(other) => anyhow::bail!("unsupported config format: .{other}"),
        }
    }

    /// Deserialize `raw` into the schema or into a raw JSON tree alike.
    fn parse<T: DeserializeOwned>(self, raw: &str) -> anyhow::Result<T> {
        Ok(match self {
            Self::Toml => toml::from_str(raw)?,
            Self::Yaml => serde_yaml::from_str(raw)?,
            Self::Json => serde_json::from_str(raw)?,
        })
    }
}

/// Load `explicit` if given, else the first config file found in standard
/// locations, else the built-in defaults.
///
/// Search order:
/// 1. `./kyron.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/kyron/kyron.{toml,yaml,yml,json}` (user-global)
///
/// Placeholders and `DISCORD_TOKEN` are resolved from the environment.
pub fn discover_and_load(explicit: Option<&Path>) -> anyhow::Result<RelayConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)?
        },
        None => {
            debug!("no config file found, using defaults");
            RelayConfig::default()
        },
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let config_dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/kyron/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "kyron").map(|d| d.config_dir().to_path_buf())
}

/// Resolve placeholders left in built-in defaults and apply `DISCORD_TOKEN`.
pub fn apply_env_overrides(config: &mut RelayConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// [`apply_env_overrides`] with a custom lookup, for tests.
pub fn apply_env_overrides_with(config: &mut RelayConfig, lookup: impl Fn(&str) -> Option<String>) {
    let token = match lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => substitute_env_with(config.token.expose_secret(), &lookup),
    };
    config.token = secrecy::Secret::new(token);

    for webhook in config.channels.values_mut() {
        *webhook = substitute_env_with(webhook, &lookup);
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "WEBHOOK_1" => Some("https://hooks.test/1".into()),
            "WEBHOOK_7" => Some("https://hooks.test/7".into()),
            _ => None,
        }
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kyron.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
token = "file-token"
reconnect_delay_secs = 9

[channels]
"42" = "https://hooks.test/42"

[liveness]
enabled = false
"#
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.token.expose_secret(), "file-token");
        assert_eq!(cfg.reconnect_delay_secs, 9);
        assert_eq!(cfg.channels.len(), 1);
        assert!(!cfg.liveness.enabled);
    }

    #[test]
    fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kyron.yaml");
        std::fs::write(
            &path,
            "channels:\n  \"7\": https://hooks.test/7\nbranding:\n  username: Relay\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(
            cfg.channels.get("7").map(String::as_str),
            Some("https://hooks.test/7")
        );
        assert_eq!(cfg.branding.username, "Relay");
    }

    #[test]
    fn raw_value_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kyron.toml");
        std::fs::write(&path, "tokn = \"x\"\n[liveness]\nport = 9000\n").unwrap();

        let raw = load_config_value(&path).unwrap();
        assert_eq!(raw["tokn"], "x");
        assert_eq!(raw["liveness"]["port"], 9000);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("kyron.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("kyron")).unwrap(),
            ConfigFormat::Toml
        );
        let raw: serde_json::Value = ConfigFormat::Json
            .parse(r#"{"liveness": {"port": 81}}"#)
            .unwrap();
        assert_eq!(raw["liveness"]["port"], 81);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kyron.ini");
        std::fs::write(&path, "token = x").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(discover_and_load(Some(&missing)).is_err());
    }

    #[test]
    fn env_overrides_resolve_default_placeholders() {
        let mut cfg = RelayConfig::default();
        apply_env_overrides_with(&mut cfg, lookup);

        assert_eq!(
            cfg.channels.get("1455072323437723790").map(String::as_str),
            Some("https://hooks.test/1")
        );
        assert_eq!(
            cfg.channels.get("1452605821744840714").map(String::as_str),
            Some("https://hooks.test/7")
        );
        assert_eq!(
            cfg.channels.get("1458848495619543040").map(String::as_str),
            Some("https://hooks.test/7")
        );
        // unset variables stay as placeholders
        assert_eq!(
            cfg.channels.get("1456736104786165854").map(String::as_str),
            Some("${WEBHOOK_2}")
        );
        assert_eq!(cfg.token.expose_secret(), "${DISCORD_TOKEN}");
    }

    #[test]
    fn token_env_overrides_file_value() {
        let mut cfg = RelayConfig {
            token: secrecy::Secret::new("from-file".into()),
            ..Default::default()
        };
        apply_env_overrides_with(&mut cfg, |name| {
            (name == TOKEN_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(cfg.token.expose_secret(), "from-env");
    }
}
