/// Server configuration
use crate::error::{Result, ServerError};
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minimum secret key length in bytes
pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Ephemeral/demo mode: wipe the schema on boot and allow a generated secret
    #[serde(default)]
    pub ephemeral: bool,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub security: SecuritySettings,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecuritySettings {
    /// Key material for signing CSRF tokens
    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_csrf_token_ttl_secs")]
    pub csrf_token_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_submit_per_minute")]
    pub submit_per_minute: u32,

    #[serde(default = "default_like_per_minute")]
    pub like_per_minute: u32,
}

/// Upload settings
///
/// No route accepts uploads; `upload_dir` is reserved and `max_content_length`
/// caps every request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, later ones winning: `config.toml` (or `path`), `MURMUR_*`
    /// variables (`__` separates sections), then `DATABASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Override with environment variables (e.g. MURMUR_SECURITY__SECRET_KEY)
        settings = settings.add_source(
            config::Environment::with_prefix("MURMUR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings = settings
            .set_override_option("storage.database_url", std::env::var("DATABASE_URL").ok())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.security.secret_key.as_deref() {
            None | Some("") if !self.ephemeral => {
                return Err(ServerError::Config(
                    "Secret key is required (set MURMUR_SECURITY__SECRET_KEY, \
                     see `murmur-server generate-secret`)"
                        .to_string(),
                ));
            }
            Some(key) if !key.is_empty() && key.len() < MIN_SECRET_KEY_LEN => {
                return Err(ServerError::Config(format!(
                    "Secret key must be at least {} bytes",
                    MIN_SECRET_KEY_LEN
                )));
            }
            _ => {}
        }

        if self.security.csrf_token_ttl_secs == 0 {
            return Err(ServerError::Config(
                "CSRF token lifetime must be positive".to_string(),
            ));
        }

        if self.rate_limit.enabled
            && (self.rate_limit.submit_per_minute == 0 || self.rate_limit.like_per_minute == 0)
        {
            return Err(ServerError::Config(
                "Rate limits must be positive when rate limiting is enabled".to_string(),
            ));
        }

        if self.uploads.max_content_length == 0 {
            return Err(ServerError::Config(
                "max_content_length must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// The secret key to sign tokens with
    ///
    /// Outside ephemeral mode this is always the configured key. In ephemeral
    /// mode a missing key is replaced by a random one, which invalidates every
    /// outstanding token on restart.
    pub fn resolve_secret_key(&self) -> Result<String> {
        match self.security.secret_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ if self.ephemeral => {
                tracing::warn!(
                    "No secret key configured, generated one for this process; \
                     sessions and tokens will not survive a restart"
                );
                Ok(generate_secret_key())
            }
            _ => Err(ServerError::Config("Secret key is required".to_string())),
        }
    }
}

/// Generate fresh random key material, base64-encoded
pub fn generate_secret_key() -> String {
    let mut bytes = [0u8; 48];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_database_url() -> String {
    "sqlite://./data/murmur.db".to_string()
}

fn default_csrf_token_ttl_secs() -> u64 {
    3600
}

fn default_enabled() -> bool {
    true
}

fn default_submit_per_minute() -> u32 {
    5
}

fn default_like_per_minute() -> u32 {
    10
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("static/uploads")
}

fn default_max_content_length() -> usize {
    16 * 1024 * 1024
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            csrf_token_ttl_secs: default_csrf_token_ttl_secs(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            submit_per_minute: default_submit_per_minute(),
            like_per_minute: default_like_per_minute(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_content_length: default_max_content_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(secret: &str) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.security.secret_key = Some(secret.to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();

        assert!(!config.ephemeral);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.rate_limit.submit_per_minute, 5);
        assert_eq!(config.rate_limit.like_per_minute, 10);
        assert_eq!(config.uploads.max_content_length, 16 * 1024 * 1024);
        assert_eq!(config.uploads.upload_dir, PathBuf::from("static/uploads"));
    }

    #[test]
    fn test_secret_required_outside_ephemeral_mode() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());
        assert!(config.resolve_secret_key().is_err());
    }

    #[test]
    fn test_ephemeral_mode_generates_secret() {
        let mut config = ServerConfig::default();
        config.ephemeral = true;

        config.validate().unwrap();
        let secret = config.resolve_secret_key().unwrap();
        assert!(secret.len() >= MIN_SECRET_KEY_LEN);
    }

    #[test]
    fn test_configured_secret_is_used_verbatim() {
        let secret = "0123456789abcdef0123456789abcdef";
        let config = with_secret(secret);

        config.validate().unwrap();
        assert_eq!(config.resolve_secret_key().unwrap(), secret);
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = with_secret("too-short");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = with_secret(&generate_secret_key());
        config.rate_limit.submit_per_minute = 0;
        assert!(config.validate().is_err());

        config.rate_limit.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate_secret_key(), generate_secret_key());
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/murmur.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
