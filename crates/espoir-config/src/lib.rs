//! Shared configuration for the Espoir client.
//!
//! TOML config with environment overrides, API-key resolution
//! (env var → system keyring → plaintext), and translation into the
//! clients `espoir-api` exposes. The presentation shell loads this at
//! startup and hands the built clients to the state core.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use espoir_api::{AuthClient, CatalogClient, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured (set ESPOIR_API_KEY, the keyring entry, or [api].api_key)")]
    NoApiKey,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to build API client: {0}")]
    Client(#[from] espoir_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub storage: StorageSection,
}

/// Remote service endpoints and credentials.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSection {
    /// Catalog service root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image CDN root, including the size segment.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Auth service root.
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// Catalog API key (plaintext — prefer the keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            auth_base_url: default_auth_base_url(),
            api_key: None,
            api_key_env: None,
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".into()
}
fn default_auth_base_url() -> String {
    "https://auth.espoir.app".into()
}
fn default_timeout() -> u64 {
    30
}

/// Durable storage location.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageSection {
    /// Override for the data directory. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "espoir", "espoir").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the durable-storage directory for the persistence gateway.
pub fn data_dir(storage: &StorageSection) -> PathBuf {
    if let Some(ref dir) = storage.data_dir {
        return dir.clone();
    }
    ProjectDirs::from("com", "espoir", "espoir")
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("espoir");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Environment keys use a double-underscore separator between sections:
/// `ESPOIR_API__BASE_URL`, `ESPOIR_STORAGE__DATA_DIR`, ...
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ESPOIR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── API-key resolution ──────────────────────────────────────────────

/// Resolve the catalog API key from the credential chain.
///
/// Order: the env var named by `api_key_env` (default `ESPOIR_API_KEY`),
/// then the system keyring, then the plaintext config value.
pub fn resolve_api_key(api: &ApiSection) -> Result<SecretString, ConfigError> {
    // 1. Environment
    let env_name = api.api_key_env.as_deref().unwrap_or("ESPOIR_API_KEY");
    if let Ok(val) = std::env::var(env_name) {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("espoir", "api-key") {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = api.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoApiKey)
}

// ── Client construction ─────────────────────────────────────────────

/// Build a [`CatalogClient`] from the `[api]` section.
pub fn build_catalog_client(api: &ApiSection) -> Result<CatalogClient, ConfigError> {
    let base_url = parse_url("api.base_url", &api.base_url)?;
    let image_base_url = parse_url("api.image_base_url", &api.image_base_url)?;
    let api_key = resolve_api_key(api)?;
    let transport = TransportConfig {
        timeout: Duration::from_secs(api.timeout),
    };
    Ok(CatalogClient::new(
        base_url,
        image_base_url,
        api_key,
        &transport,
    )?)
}

/// Build an [`AuthClient`] from the `[api]` section.
pub fn build_auth_client(api: &ApiSection) -> Result<AuthClient, ConfigError> {
    let auth_base_url = parse_url("api.auth_base_url", &api.auth_base_url)?;
    let transport = TransportConfig {
        timeout: Duration::from_secs(api.timeout),
    };
    Ok(AuthClient::new(auth_base_url, &transport)?)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_services() {
        let cfg = Config::default();
        assert_eq!(cfg.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(cfg.api.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(cfg.api.timeout, 30);
        assert!(cfg.storage.data_dir.is_none());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [api]
                base_url = "https://catalog.test/v3"
                api_key = "plaintext-key"

                [storage]
                data_dir = "/tmp/espoir-test"
                "#,
            )?;

            let figment = Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("ESPOIR_").split("__"));
            let cfg: Config = figment.extract()?;

            assert_eq!(cfg.api.base_url, "https://catalog.test/v3");
            assert_eq!(cfg.api.api_key.as_deref(), Some("plaintext-key"));
            assert_eq!(
                cfg.storage.data_dir.as_deref(),
                Some(std::path::Path::new("/tmp/espoir-test"))
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[api]\nbase_url = \"https://from-file\"\n")?;
            jail.set_env("ESPOIR_API__BASE_URL", "https://from-env");

            let figment = Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("ESPOIR_").split("__"));
            let cfg: Config = figment.extract()?;

            assert_eq!(cfg.api.base_url, "https://from-env");
            Ok(())
        });
    }

    #[test]
    fn env_var_wins_over_plaintext_key() {
        use secrecy::ExposeSecret;

        figment::Jail::expect_with(|jail| {
            jail.set_env("ESPOIR_TEST_KEY", "from-env");

            let api = ApiSection {
                api_key: Some("from-config".into()),
                api_key_env: Some("ESPOIR_TEST_KEY".into()),
                ..ApiSection::default()
            };

            let key = resolve_api_key(&api).unwrap();
            assert_eq!(key.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_key_everywhere_is_an_error() {
        let api = ApiSection {
            api_key_env: Some("ESPOIR_DEFINITELY_UNSET_KEY".into()),
            ..ApiSection::default()
        };
        // Keyring may be unavailable in CI; plaintext and env are unset.
        let result = resolve_api_key(&api);
        if let Err(err) = result {
            assert!(matches!(err, ConfigError::NoApiKey));
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let api = ApiSection {
            base_url: "not a url".into(),
            api_key: Some("k".into()),
            api_key_env: Some("ESPOIR_DEFINITELY_UNSET_KEY".into()),
            ..ApiSection::default()
        };
        let err = build_catalog_client(&api).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn explicit_data_dir_overrides_platform_default() {
        let storage = StorageSection {
            data_dir: Some(PathBuf::from("/var/lib/espoir")),
        };
        assert_eq!(data_dir(&storage), PathBuf::from("/var/lib/espoir"));
    }
}
