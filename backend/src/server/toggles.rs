//! Boolean switches read straight from the environment.
//!
//! They stay out of [`AppSettings`](super::AppSettings) so that an unset
//! switch keeps its default instead of a value merged from absent CLI flags.

use mockable::Env;
use tracing::warn;

use super::settings::InvalidSetting;

pub(crate) const COOKIE_SECURE_ENV: &str = "BITACORA_COOKIE_SECURE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "BITACORA_ALLOW_EPHEMERAL_SECRETS";
const BOOL_EXPECTED: &str = "expected 1|0|true|false|yes|no|y|n";

/// Startup switches with their defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    /// Whether session cookies carry `Secure`. On unless disabled.
    pub cookie_secure: bool,
    /// Generate throwaway secrets when the secret files are unreadable.
    pub allow_ephemeral_secrets: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            cookie_secure: true,
            allow_ephemeral_secrets: false,
        }
    }
}

impl Toggles {
    /// Read both switches from `env`.
    ///
    /// # Errors
    ///
    /// A present value that is not a recognised boolean is refused rather
    /// than silently defaulted.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, InvalidSetting> {
        let defaults = Self::default();
        let toggles = Self {
            cookie_secure: bool_from_env(env, COOKIE_SECURE_ENV, defaults.cookie_secure)?,
            allow_ephemeral_secrets: bool_from_env(
                env,
                ALLOW_EPHEMERAL_ENV,
                defaults.allow_ephemeral_secrets,
            )?,
        };
        if !toggles.cookie_secure {
            warn!("{COOKIE_SECURE_ENV} disabled; session cookies travel without Secure");
        }
        Ok(toggles)
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    name: &'static str,
    default: bool,
) -> Result<bool, InvalidSetting> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    parse_bool(&value).ok_or_else(|| InvalidSetting {
        name,
        value,
        reason: BOOL_EXPECTED.to_owned(),
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
