//! Tests for the user field types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("alice@hospital.com", "alice@hospital.com")]
#[case("  Bob.Smith@Clinic.ORG ", "bob.smith@clinic.org")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("no-at-sign")]
#[case("@hospital.com")]
#[case("alice@")]
#[case("alice@localhost")]
#[case("alice@@hospital.com")]
#[case("ali ce@hospital.com")]
#[case("alice@hospital..com")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(Email::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn display_name_is_trimmed() {
    let name = DisplayName::new("  Ana Torres ").expect("valid name");
    assert_eq!(name.as_ref(), "Ana Torres");
}

#[rstest]
#[case("   ", UserValidationError::EmptyDisplayName)]
fn display_name_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(DisplayName::new(raw), Err(expected));
}

#[rstest]
fn display_name_rejects_overlong_values() {
    let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
#[case("12345", false)]
#[case("123456", true)]
#[case("correct horse", true)]
fn password_enforces_minimum_length(#[case] raw: &str, #[case] accepted: bool) {
    assert_eq!(NewPassword::new(raw).is_ok(), accepted);
}

#[rstest]
fn password_debug_output_is_redacted() {
    let password = NewPassword::new("hunter22").expect("valid password");
    assert!(!format!("{password:?}").contains("hunter22"));
}

#[rstest]
#[case("ADMIN", Ok(Role::Admin))]
#[case("TECNICO", Ok(Role::Tecnico))]
#[case("admin", Err(UserValidationError::UnknownRole))]
#[case("SUPERVISOR", Err(UserValidationError::UnknownRole))]
fn role_parses_exact_names(#[case] raw: &str, #[case] expected: Result<Role, UserValidationError>) {
    assert_eq!(raw.parse::<Role>(), expected);
}

#[rstest]
#[case("tecnico", Some(Role::Tecnico))]
#[case("Admin", Some(Role::Admin))]
#[case("monitor", None)]
fn role_matches_search_terms_ignoring_case(#[case] term: &str, #[case] expected: Option<Role>) {
    assert_eq!(Role::match_term(term), expected);
}

#[rstest]
fn role_defaults_to_technician() {
    assert_eq!(Role::default(), Role::Tecnico);
}
