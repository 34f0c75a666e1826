//! Startup settings loaded via OrthoConfig.
//!
//! Every field can come from a `BITACORA_*` environment variable, a
//! matching CLI flag, or a configuration file. Boolean switches live in
//! [`super::toggles`] instead.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use bitacora::outbound::persistence::PoolConfig;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/bitacora_token_key";
const DEFAULT_SIGNING_SECRET_FILE: &str = "/var/run/secrets/bitacora_signing_key";
const DEFAULT_STORAGE_ROOT: &str = "./storage";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_ADMIN_EMAIL: &str = "admin@hospital.com";
const DEFAULT_ADMIN_NAME: &str = "Administrador";

/// Values controlling how the server binds, stores, and seeds.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BITACORA")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one, records live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_pool_size: Option<u32>,
    /// Seconds to wait for a free database connection.
    pub database_checkout_timeout_secs: Option<u64>,
    /// File holding the session token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// File holding the download link signing secret.
    pub signing_secret_file: Option<PathBuf>,
    /// Directory holding uploaded attachments.
    pub storage_root: Option<PathBuf>,
    /// API base that signed download links point at.
    pub public_base_url: Option<String>,
    /// Email of the administrator seeded when none is active.
    #[serde(default, deserialize_with = "scalar_text")]
    pub bootstrap_admin_email: Option<String>,
    /// Display name of the seeded administrator.
    #[serde(default, deserialize_with = "scalar_text")]
    pub bootstrap_admin_name: Option<String>,
    /// Initial password of the seeded administrator. Seeding is skipped
    /// without one.
    #[serde(default, deserialize_with = "scalar_text")]
    pub bootstrap_admin_password: Option<String>,
}

/// Accept any scalar as text.
///
/// Environment values such as `12345678` arrive typed as numbers, but the
/// admin fields are free text.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarText;

    impl<'de> Visitor<'de> for ScalarText {
        type Value = Option<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string, number, or boolean")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_owned()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i128<E: de::Error>(self, value: i128) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(ScalarText)
}

/// A setting holds a value the server cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}='{value}': {reason}")]
pub struct InvalidSetting {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

impl AppSettings {
    /// Parsed bind address, defaulting to every interface on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, InvalidSetting> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| InvalidSetting {
            name: "bind_addr",
            value: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Pool sizing for `database_url`, when one is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(size) = self.database_pool_size {
            config = config.with_max_size(size);
        }
        if let Some(secs) = self.database_checkout_timeout_secs {
            config = config.with_checkout_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }

    pub fn token_secret_file(&self) -> PathBuf {
        self.token_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_SECRET_FILE))
    }

    pub fn signing_secret_file(&self) -> PathBuf {
        self.signing_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SIGNING_SECRET_FILE))
    }

    pub fn storage_root(&self) -> PathBuf {
        self.storage_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT))
    }

    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
    }

    pub fn bootstrap_admin_email(&self) -> &str {
        self.bootstrap_admin_email
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_EMAIL)
    }

    pub fn bootstrap_admin_name(&self) -> &str {
        self.bootstrap_admin_name
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_NAME)
    }
}
