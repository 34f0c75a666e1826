//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use bitacora::domain::{BootstrapAdmin, DisplayName, Email, NewPassword};
use bitacora::outbound::persistence::DbPool;
use zeroize::Zeroizing;

use super::secrets::{BuildMode, SecretError, load_secret};
use super::settings::{AppSettings, InvalidSetting};
use super::toggles::Toggles;

/// Signing material for session tokens and download links.
pub struct Secrets {
    pub(crate) token: Zeroizing<Vec<u8>>,
    pub(crate) signing: Zeroizing<Vec<u8>>,
}

impl Secrets {
    /// Load both secrets from the files named in `settings`.
    pub fn load(
        settings: &AppSettings,
        toggles: &Toggles,
        mode: BuildMode,
    ) -> Result<Self, SecretError> {
        let allow = toggles.allow_ephemeral_secrets;
        Ok(Self {
            token: load_secret("token secret", &settings.token_secret_file(), mode, allow)?,
            signing: load_secret("signing secret", &settings.signing_secret_file(), mode, allow)?,
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) secrets: Secrets,
    pub(crate) cookie_secure: bool,
    pub(crate) storage_root: PathBuf,
    pub(crate) public_base_url: String,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Construct a configuration with secure cookies, no database, and no
    /// bootstrap administrator.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        secrets: Secrets,
        storage_root: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            bind_addr,
            secrets,
            cookie_secure: true,
            storage_root,
            public_base_url: public_base_url.into(),
            db_pool: None,
            bootstrap_admin: None,
        }
    }

    /// Set whether session cookies carry `Secure`.
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server keeps every record in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed `admin` at startup when no active administrator exists.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: Option<BootstrapAdmin>) -> Self {
        self.bootstrap_admin = admin;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Bootstrap administrator described by `settings`, or `None` when no
/// password is configured.
pub fn bootstrap_admin(settings: &AppSettings) -> Result<Option<BootstrapAdmin>, InvalidSetting> {
    let Some(password) = settings.bootstrap_admin_password.as_deref() else {
        return Ok(None);
    };
    let invalid = |name: &'static str, value: &str, reason: String| InvalidSetting {
        name,
        value: value.to_owned(),
        reason,
    };
    let email_raw = settings.bootstrap_admin_email();
    let name_raw = settings.bootstrap_admin_name();
    Ok(Some(BootstrapAdmin {
        email: Email::new(email_raw)
            .map_err(|err| invalid("bootstrap_admin_email", email_raw, err.to_string()))?,
        display_name: DisplayName::new(name_raw)
            .map_err(|err| invalid("bootstrap_admin_name", name_raw, err.to_string()))?,
        password: NewPassword::new(password)
            .map_err(|err| invalid("bootstrap_admin_password", "<redacted>", err.to_string()))?,
    }))
}
