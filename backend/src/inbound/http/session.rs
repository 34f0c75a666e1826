//! Session helpers to keep HTTP handlers free of token plumbing.
//!
//! The login handler hands the signed token back as an `HttpOnly`
//! `accessToken` cookie together with a script-readable `session_exists`
//! flag. Protected handlers take a [`SessionContext`], which resolves the
//! token from that cookie (or an `Authorization: Bearer` header) through the
//! [`SessionAuthenticator`](crate::domain::ports::SessionAuthenticator) port.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::authorization::require_role;
use crate::domain::{Error, Identity, Role, SESSION_TTL};
use crate::inbound::http::state::HttpState;

/// Cookie carrying the signed session token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Companion cookie telling browser code a session is present.
pub const SESSION_FLAG_COOKIE: &str = "session_exists";

const BEARER_PREFIX: &str = "Bearer ";

/// Attributes shared by both session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Whether cookies carry the `Secure` attribute.
    pub secure: bool,
}

impl CookiePolicy {
    /// Cookies for a freshly issued session.
    pub fn session_cookies(&self, token: &str) -> Result<[Cookie<'static>; 2], Error> {
        let max_age = CookieDuration::try_from(SESSION_TTL)
            .map_err(|err| Error::internal(format!("session lifetime out of range: {err}")))?;
        Ok([
            self.cookie(ACCESS_TOKEN_COOKIE, token.to_owned(), true, max_age),
            self.cookie(SESSION_FLAG_COOKIE, "true".to_owned(), false, max_age),
        ])
    }

    /// Expired replacements that make the browser drop both cookies.
    pub fn cleared_cookies(&self) -> [Cookie<'static>; 2] {
        [
            self.cookie(ACCESS_TOKEN_COOKIE, String::new(), true, CookieDuration::ZERO),
            self.cookie(SESSION_FLAG_COOKIE, String::new(), false, CookieDuration::ZERO),
        ]
    }

    fn cookie(
        &self,
        name: &'static str,
        value: String,
        http_only: bool,
        max_age: CookieDuration,
    ) -> Cookie<'static> {
        Cookie::build(name, value)
            .path("/")
            .http_only(http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(max_age)
            .finish()
    }
}

fn presented_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::to_owned)
}

/// Authenticated caller resolved from the request's session token.
#[derive(Debug, Clone)]
pub struct SessionContext(Identity);

impl SessionContext {
    /// Identity encoded in the token.
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Return the identity when its role is in `permitted`, else
    /// `403 Forbidden`.
    pub fn require(&self, permitted: &[Role]) -> Result<&Identity, Error> {
        require_role(&self.0, permitted)?;
        Ok(&self.0)
    }
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state is not configured")));
        };
        let token = presented_token(req);
        ready(
            state
                .sessions
                .authenticate(token.as_deref())
                .map(SessionContext),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::authorization::ADMIN_ONLY;
    use crate::inbound::http::test_utils::{TestPorts, bearer_token};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;

    fn whoami_app(
        ports: TestPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    HttpResponse::Ok().body(session.identity().role.as_str())
                }),
            )
            .route(
                "/admin",
                web::get().to(|session: SessionContext| async move {
                    session.require(ADMIN_ONLY)?;
                    Ok::<_, Error>(HttpResponse::NoContent())
                }),
            )
    }

    #[actix_web::test]
    async fn resolves_identity_from_cookie() {
        let app = actix_test::init_service(whoami_app(TestPorts::default())).await;
        let token = bearer_token(Role::Tecnico);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "TECNICO");
    }

    #[actix_web::test]
    async fn accepts_bearer_header() {
        let app = actix_test::init_service(whoami_app(TestPorts::default())).await;
        let token = bearer_token(Role::Admin);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;

        assert_eq!(actix_test::read_body(res).await, "ADMIN");
    }

    #[rstest]
    #[case(None, ErrorCode::Unauthenticated)]
    #[case(Some("forged.token.value"), ErrorCode::InvalidToken)]
    #[actix_web::test]
    async fn rejects_missing_or_bad_tokens(
        #[case] token: Option<&str>,
        #[case] expected: ErrorCode,
    ) {
        let app = actix_test::init_service(whoami_app(TestPorts::default())).await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(token) = token {
            request = request.cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token.to_owned()));
        }

        let res = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), expected);
    }

    #[actix_web::test]
    async fn role_check_returns_forbidden() {
        let app = actix_test::init_service(whoami_app(TestPorts::default())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin")
                .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, bearer_token(Role::Tecnico)))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn session_cookies_follow_policy(#[case] secure: bool) {
        let policy = CookiePolicy { secure };
        let [access, flag] = policy.session_cookies("tok").expect("cookies");

        assert_eq!(access.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.secure(), Some(secure));
        assert_eq!(access.max_age(), Some(CookieDuration::hours(8)));
        assert_eq!(flag.name(), SESSION_FLAG_COOKIE);
        assert_eq!(flag.http_only(), Some(false));
        assert_eq!(flag.value(), "true");
    }

    #[test]
    fn cleared_cookies_expire_immediately() {
        let [access, flag] = CookiePolicy { secure: false }.cleared_cookies();
        assert_eq!(access.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(flag.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(access.value(), "");
    }
}
