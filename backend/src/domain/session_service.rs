//! Resolves presented session tokens into caller identities.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SessionAuthenticator, TokenCodec, TokenCodecError};
use crate::domain::{Error, Identity};

/// Stateless token verification against the injected clock.
#[derive(Clone)]
pub struct SessionService<T> {
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> SessionService<T> {
    /// Create a new service with the given codec.
    pub fn new(tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { tokens, clock }
    }
}

impl<T: TokenCodec> SessionAuthenticator for SessionService<T> {
    fn authenticate(&self, token: Option<&str>) -> Result<Identity, Error> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthenticated("login required"))?;

        self.tokens
            .verify(token, self.clock.utc())
            .map_err(|error| {
                debug!(%error, "session token rejected");
                match error {
                    TokenCodecError::Expired => Error::invalid_token("session expired"),
                    _ => Error::invalid_token("invalid session token"),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::Role;
    use crate::domain::ports::MockTokenCodec;
    use crate::domain::test_fixtures::{fixed_clock, fixture_now, identity};
    use rstest::rstest;

    fn service(codec: MockTokenCodec) -> SessionService<MockTokenCodec> {
        SessionService::new(Arc::new(codec), fixed_clock())
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn missing_token_is_unauthenticated(#[case] token: Option<&str>) {
        let error = service(MockTokenCodec::new())
            .authenticate(token)
            .expect_err("no token");
        assert_eq!(error.code(), ErrorCode::Unauthenticated);
    }

    #[rstest]
    #[case(TokenCodecError::Expired)]
    #[case(TokenCodecError::invalid("bad signature"))]
    fn rejected_token_is_invalid(#[case] rejection: TokenCodecError) {
        let mut codec = MockTokenCodec::new();
        codec.expect_verify().return_once(move |_, _| Err(rejection));

        let error = service(codec)
            .authenticate(Some("tampered"))
            .expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::InvalidToken);
    }

    #[test]
    fn verifies_against_clock_time() {
        let caller = identity(Role::Tecnico);
        let expected = caller.clone();
        let mut codec = MockTokenCodec::new();
        codec
            .expect_verify()
            .withf(|token, now| token == "signed" && *now == fixture_now())
            .times(1)
            .return_once(move |_, _| Ok(caller));

        let resolved = service(codec)
            .authenticate(Some("signed"))
            .expect("valid token");
        assert_eq!(resolved, expected);
    }
}
