//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::TimeDelta;

use crate::domain::ports::{
    MockEquipmentRegistry, MockLoginService, MockMaintenanceLog, MockSignedFileReader,
    MockStatsQuery, MockUserAccounts, TokenCodec,
};
use crate::domain::test_fixtures::{fixed_clock, fixture_now};
use crate::domain::{DisplayName, Identity, Role, SessionService, UserId};
use crate::inbound::http::session::CookiePolicy;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::security::JwtTokenCodec;

const TEST_TOKEN_SECRET: &[u8] = b"inbound-http-test-secret";

const ADMIN_ID: &str = "11111111-1111-4111-8111-111111111111";
const TECNICO_ID: &str = "22222222-2222-4222-8222-222222222222";

fn codec() -> JwtTokenCodec {
    JwtTokenCodec::new(TEST_TOKEN_SECRET)
}

/// Stable identity per role so ownership assertions can name the caller.
pub(crate) fn identity_for(role: Role) -> Identity {
    let id = match role {
        Role::Admin => ADMIN_ID,
        Role::Tecnico => TECNICO_ID,
    };
    Identity {
        user_id: UserId::new(id).expect("fixture id"),
        display_name: DisplayName::new("Ana Torres").expect("fixture name"),
        role,
    }
}

/// Token accepted by [`TestPorts::into_state`] for `identity`.
pub(crate) fn token_for(identity: &Identity) -> String {
    codec()
        .issue(identity, fixture_now(), fixture_now() + TimeDelta::hours(8))
        .expect("issue token")
        .as_str()
        .to_owned()
}

/// Token for the fixed identity holding `role`.
pub(crate) fn bearer_token(role: Role) -> String {
    token_for(&identity_for(role))
}

/// Driving-port mocks for handler tests. Unset expectations panic when hit.
#[derive(Default)]
pub(crate) struct TestPorts {
    pub login: MockLoginService,
    pub users: MockUserAccounts,
    pub equipment: MockEquipmentRegistry,
    pub maintenance: MockMaintenanceLog,
    pub stats: MockStatsQuery,
    pub files: MockSignedFileReader,
}

impl TestPorts {
    /// Assemble HTTP state with a real token verifier pinned to the fixture
    /// clock and insecure cookies.
    pub(crate) fn into_state(self) -> HttpState {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            sessions: Arc::new(SessionService::new(Arc::new(codec()), fixed_clock())),
            users: Arc::new(self.users),
            equipment: Arc::new(self.equipment),
            maintenance: Arc::new(self.maintenance),
            stats: Arc::new(self.stats),
            files: Arc::new(self.files),
        };
        HttpState::new(ports, fixed_clock(), CookiePolicy { secure: false })
    }
}
