/// Config schema types (token, channels, rewrite rules, branding, liveness).
use {
    indexmap::IndexMap,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Channel table used when no config file overrides it.
///
/// Channel IDs mapped to `${WEBHOOK_n}` placeholders, resolved from the
/// environment at load time. Two channels share `WEBHOOK_7`.
pub const DEFAULT_CHANNELS: &[(&str, &str)] = &[
    ("1455072323437723790", "${WEBHOOK_1}"),
    ("1456736104786165854", "${WEBHOOK_2}"),
    ("1457457266654711852", "${WEBHOOK_3}"),
    ("1457456266610872480", "${WEBHOOK_4}"),
    ("1457456645134221365", "${WEBHOOK_5}"),
    ("1457686769905434701", "${WEBHOOK_6}"),
    ("1452605821744840714", "${WEBHOOK_7}"),
    ("1458848495619543040", "${WEBHOOK_7}"),
    ("1465376509555376218", "${WEBHOOK_8}"),
];

pub const DEFAULT_FOOTER_ICON_URL: &str = "https://7772c203-dbb6-4da9-a38c-8a330b69e346-00-1ievmmz7y5kbf.picard.replit.dev/static/standard-1_1769351762261.gif";

/// Root configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Discord bot token.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Fixed pause between a failed session and the next connection attempt.
    pub reconnect_delay_secs: u64,

    /// Channel ID → webhook URL, in declaration order.
    pub channels: IndexMap<String, String>,

    pub rewrite: RewriteConfig,
    pub branding: BrandingConfig,
    pub liveness: LivenessConfig,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("token", &"[REDACTED]")
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("channels", &self.channels.len())
            .field("rewrite", &self.rewrite)
            .field("liveness", &self.liveness)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            token: Secret::new("${DISCORD_TOKEN}".into()),
            reconnect_delay_secs: 5,
            channels: DEFAULT_CHANNELS
                .iter()
                .map(|(id, url)| ((*id).to_string(), (*url).to_string()))
                .collect(),
            rewrite: RewriteConfig::default(),
            branding: BrandingConfig::default(),
            liveness: LivenessConfig::default(),
        }
    }
}

/// Ordered text substitutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub rules: Vec<RewriteRuleConfig>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            rules: kyron_rewrite::DEFAULT_RULES
                .iter()
                .map(|(pattern, replacement)| RewriteRuleConfig {
                    pattern: (*pattern).into(),
                    replacement: (*replacement).into(),
                })
                .collect(),
        }
    }
}

/// A case-insensitive regex and its literal replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRuleConfig {
    pub pattern: String,
    pub replacement: String,
}

/// Identity stamped on every forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Webhook display name override.
    pub username: String,
    /// Footer text written into every embed (replaces any existing footer).
    pub footer_text: String,
    pub footer_icon_url: String,
    /// Embed color used when the source embed has none.
    pub default_color: u32,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            username: "Kyron notifier".into(),
            footer_text: "Kyron Notifier • Made by xvshady and _gg".into(),
            footer_icon_url: DEFAULT_FOOTER_ICON_URL.into(),
            default_color: 0x2b2d31,
        }
    }
}

/// Liveness HTTP endpoint for uptime monitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}
