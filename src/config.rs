//! # Configuration Management
//!
//! Centralized configuration for the codec framework.
//!
//! This module provides structured configuration for the codec registry,
//! decoding limits, signing behaviour and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variables prefixed with `CCNX_CODEC_`
//!
//! ## Example
//! ```toml
//! [registry]
//! duplicate_policy = "reject"
//! freeze_after_init = true
//!
//! [limits]
//! max_message_size = 65536
//!
//! [signing]
//! embed_public_key = true
//! include_signing_time = true
//! ```

use crate::codec::registry::DuplicatePolicy;
use crate::core::tlv::{MAX_VALUE_LENGTH, TL_SIZE};
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Default upper bound on an encoded packet body (64 KiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Largest body the wire format can express: message, validation algorithm
/// and validation payload, each a full-length TLV.
pub const MAX_ENCODABLE_BODY: usize = 3 * (TL_SIZE + MAX_VALUE_LENGTH);

/// Main codec configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Codec registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Decoding and encoding limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Signing configuration
    #[serde(default)]
    pub signing: SigningConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Reads a TOML file. Missing sections and keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CodecError::ConfigError(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CodecError::ConfigError(format!("Invalid codec config: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults; set but unparsable values are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var("CCNX_CODEC_DUPLICATE_POLICY") {
            config.registry.duplicate_policy = match policy.to_ascii_lowercase().as_str() {
                "reject" => DuplicatePolicy::Reject,
                "keep_first" => DuplicatePolicy::KeepFirst,
                other => {
                    return Err(CodecError::ConfigError(format!(
                        "Invalid CCNX_CODEC_DUPLICATE_POLICY: '{other}' (expected 'reject' or 'keep_first')"
                    )))
                }
            };
        }

        if let Ok(freeze) = std::env::var("CCNX_CODEC_FREEZE_AFTER_INIT") {
            config.registry.freeze_after_init = parse_env("CCNX_CODEC_FREEZE_AFTER_INIT", &freeze)?;
        }

        if let Ok(size) = std::env::var("CCNX_CODEC_MAX_MESSAGE_SIZE") {
            config.limits.max_message_size = parse_env("CCNX_CODEC_MAX_MESSAGE_SIZE", &size)?;
        }

        if let Ok(embed) = std::env::var("CCNX_CODEC_EMBED_PUBLIC_KEY") {
            config.signing.embed_public_key = parse_env("CCNX_CODEC_EMBED_PUBLIC_KEY", &embed)?;
        }

        if let Ok(time) = std::env::var("CCNX_CODEC_INCLUDE_SIGNING_TIME") {
            config.signing.include_signing_time =
                parse_env("CCNX_CODEC_INCLUDE_SIGNING_TIME", &time)?;
        }

        if let Ok(level) = std::env::var("CCNX_CODEC_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| CodecError::ConfigError(format!("Invalid CCNX_CODEC_LOG_LEVEL: '{level}'")))?;
        }

        Ok(config)
    }

    /// Default configuration with `mutator` applied
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// The default configuration rendered as TOML
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Cannot serialize codec config: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| CodecError::ConfigError(format!("Cannot write config file: {e}")))
    }

    /// Every problem found in the configuration. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.limits.validate();
        errors.extend(self.logging.validate());
        errors
    }

    /// Like [`validate`](Self::validate), folding the problems into one error.
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        Err(CodecError::ConfigError(format!(
            "invalid codec config:\n  - {}",
            errors.join("\n  - ")
        )))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| CodecError::ConfigError(format!("Invalid {name}: '{value}'")))
}

/// Codec registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// What happens when a TID is registered twice
    pub duplicate_policy: DuplicatePolicy,

    /// Freeze the registry once the standard codecs are registered
    pub freeze_after_init: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            freeze_after_init: true,
        }
    }
}

/// Size limits applied by the packet body codec
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest encoded packet body accepted or produced, in bytes
    pub max_message_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl LimitsConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_message_size < TL_SIZE {
            errors.push(format!(
                "Max message size too small: {} bytes (minimum: {TL_SIZE})",
                self.max_message_size
            ));
        } else if self.max_message_size > MAX_ENCODABLE_BODY {
            errors.push(format!(
                "Max message size {} exceeds the largest encodable body ({MAX_ENCODABLE_BODY} bytes)",
                self.max_message_size
            ));
        }

        errors
    }
}

/// Signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Embed the signer's public key in the validation algorithm
    pub embed_public_key: bool,

    /// Stamp signed packets with the current time
    pub include_signing_time: bool,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            embed_public_key: true,
            include_signing_time: true,
        }
    }
}

/// Where codec diagnostics go and how verbose they are.
///
/// Consumed by [`crate::utils::init_logging`]. `RUST_LOG` overrides `log_level`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Reported once when logging starts
    pub app_name: String,

    #[serde(with = "level_name")]
    pub log_level: Level,

    pub log_to_console: bool,

    pub log_to_file: bool,

    /// Required when `log_to_file` is set
    pub log_file_path: Option<String>,

    /// Emit one JSON object per event instead of text lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("ccnx-codec"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

/// Longest accepted `app_name`
const MAX_APP_NAME_LEN: usize = 64;

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.app_name.len() {
            0 => errors.push("Logging app_name cannot be empty".to_string()),
            len if len > MAX_APP_NAME_LEN => errors.push(format!(
                "Logging app_name is {len} characters (maximum: {MAX_APP_NAME_LEN})"
            )),
            _ => {}
        }

        match (&self.log_file_path, self.log_to_file) {
            (None, true) => errors
                .push("log_file_path must be specified when log_to_file is true".to_string()),
            (Some(path), true) => {
                let dir = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty());
                if let Some(dir) = dir.filter(|d| !d.exists()) {
                    errors.push(format!("Log directory {} does not exist", dir.display()));
                }
            }
            _ => {}
        }

        if !(self.log_to_console || self.log_to_file) {
            errors.push("At least one logging output must be enabled (console or file)".to_string());
        }

        errors
    }
}

/// `tracing::Level` as a lowercase name such as `"debug"`.
mod level_name {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<Level>()
            .map_err(|_| de::Error::custom(format!("unknown log level '{name}'")))
    }
}
