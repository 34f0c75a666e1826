//! HMAC-SHA256 signed download links.
//!
//! A link names the object key, its expiry in Unix seconds, and a hex MAC
//! over both: `{base}/files/{key}?expires={secs}&signature={hex}`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use url::Url;

use crate::domain::{FileKey, SignedUrl};

type HmacSha256 = Hmac<Sha256>;

/// Reasons a link cannot be produced or is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlSignerError {
    /// The public base URL cannot carry path segments.
    #[error("public base url is unusable: {0}")]
    InvalidBaseUrl(String),
    /// The signing secret is empty.
    #[error("signing secret must not be empty")]
    EmptySecret,
    /// The link expired.
    #[error("link expired")]
    Expired,
    /// The signature does not match the key and expiry.
    #[error("signature mismatch")]
    BadSignature,
}

/// Produces and checks signed download links.
#[derive(Clone)]
pub struct UrlSigner {
    keyed: HmacSha256,
    base_url: Url,
}

impl UrlSigner {
    /// Create a signer for links under `base_url` (e.g.
    /// `https://cma.example.org/api/v1`).
    ///
    /// # Errors
    ///
    /// Fails when the secret is empty or the URL cannot hold a path.
    pub fn new(secret: impl Into<Vec<u8>>, base_url: &str) -> Result<Self, UrlSignerError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(UrlSignerError::EmptySecret);
        }
        let keyed =
            HmacSha256::new_from_slice(&secret).map_err(|_| UrlSignerError::EmptySecret)?;
        let base_url =
            Url::parse(base_url).map_err(|err| UrlSignerError::InvalidBaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UrlSignerError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { keyed, base_url })
    }

    fn mac(&self, key: &FileKey, expires: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(key.as_str().as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Link to `key` valid until `expires_at`.
    pub fn sign(&self, key: &FileKey, expires_at: DateTime<Utc>) -> SignedUrl {
        let expires = expires_at.timestamp();
        let signature = hex::encode(self.mac(key, expires).finalize().into_bytes());

        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("files");
            segments.extend(key.as_str().split('/'));
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature);
        SignedUrl::new(url.to_string())
    }

    /// Check a presented link at `now`.
    ///
    /// # Errors
    ///
    /// [`UrlSignerError::BadSignature`] for forged or altered links, then
    /// [`UrlSignerError::Expired`] for genuine links past their expiry.
    pub fn verify(
        &self,
        key: &FileKey,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), UrlSignerError> {
        let provided = hex::decode(signature).map_err(|_| UrlSignerError::BadSignature)?;
        self.mac(key, expires)
            .verify_slice(&provided)
            .map_err(|_| {
                debug!(key = %key, "signed link rejected");
                UrlSignerError::BadSignature
            })?;
        if now.timestamp() > expires {
            return Err(UrlSignerError::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn signer() -> UrlSigner {
        UrlSigner::new(b"unit-test-signing-secret".to_vec(), "http://localhost:8080/api/v1/")
            .expect("signer")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("timestamp")
    }

    fn key() -> FileKey {
        FileKey::new("manuales/abc-manual de uso.pdf").expect("key")
    }

    fn parts(url: &SignedUrl) -> (String, i64, String) {
        let parsed = Url::parse(url.as_str()).expect("url");
        let mut expires = 0;
        let mut signature = String::new();
        for (name, value) in parsed.query_pairs() {
            match name.as_ref() {
                "expires" => expires = value.parse().expect("expires"),
                "signature" => signature = value.into_owned(),
                _ => {}
            }
        }
        (parsed.path().to_owned(), expires, signature)
    }

    #[rstest]
    fn signed_link_verifies_until_expiry(signer: UrlSigner) {
        let url = signer.sign(&key(), now() + TimeDelta::minutes(20));
        let (path, expires, signature) = parts(&url);

        assert_eq!(path, "/api/v1/files/manuales/abc-manual%20de%20uso.pdf");
        signer
            .verify(&key(), expires, &signature, now())
            .expect("fresh link");
        assert_eq!(
            signer.verify(&key(), expires, &signature, now() + TimeDelta::minutes(21)),
            Err(UrlSignerError::Expired)
        );
    }

    #[rstest]
    fn tampering_is_detected(signer: UrlSigner) {
        let url = signer.sign(&key(), now() + TimeDelta::minutes(20));
        let (_, expires, signature) = parts(&url);

        assert_eq!(
            signer.verify(&key(), expires + 3600, &signature, now()),
            Err(UrlSignerError::BadSignature)
        );
        let other = FileKey::new("manuales/otro.pdf").expect("key");
        assert_eq!(
            signer.verify(&other, expires, &signature, now()),
            Err(UrlSignerError::BadSignature)
        );
        assert_eq!(
            signer.verify(&key(), expires, "zz", now()),
            Err(UrlSignerError::BadSignature)
        );
    }

    #[rstest]
    #[case(b"".to_vec(), "http://localhost/api/v1", UrlSignerError::EmptySecret)]
    #[case(b"s".to_vec(), "mailto:admin@hospital.com", UrlSignerError::InvalidBaseUrl("mailto:admin@hospital.com".to_owned()))]
    fn rejects_bad_configuration(
        #[case] secret: Vec<u8>,
        #[case] base: &str,
        #[case] expected: UrlSignerError,
    ) {
        assert_eq!(UrlSigner::new(secret, base).err(), Some(expected));
    }
}
