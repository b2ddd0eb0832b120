//! Domain-focused tests for identity value validation.

use crate::identity::domain::{EmailAddress, IdentityDomainError, UserAccount, Username};
use rstest::rstest;

#[rstest]
fn username_accepts_and_trims_valid_values() {
    let username = Username::new("  fern_w  ").expect("valid username");
    assert_eq!(username.as_str(), "fern_w");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("two words")]
fn username_rejects_invalid_values(#[case] raw: &str) {
    let result = Username::new(raw);
    assert_eq!(
        result,
        Err(IdentityDomainError::InvalidUsername(raw.to_owned()))
    );
}

#[rstest]
fn username_rejects_overlong_values() {
    let raw = "x".repeat(65);
    let result = Username::new(raw.clone());
    assert_eq!(result, Err(IdentityDomainError::InvalidUsername(raw)));
}

#[rstest]
fn email_accepts_valid_addresses() {
    let email = EmailAddress::new("fern@example.org").expect("valid email");
    assert_eq!(email.as_str(), "fern@example.org");
}

#[rstest]
#[case("plain")]
#[case("@example.org")]
#[case("fern@")]
#[case("fern@nodot")]
#[case("a@b@c.org")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    let result = EmailAddress::new(raw);
    assert_eq!(result, Err(IdentityDomainError::InvalidEmail(raw.to_owned())));
}

#[rstest]
fn account_builders_set_profile_fields() {
    let account = UserAccount::new(
        Username::new("fern").expect("valid username"),
        EmailAddress::new("fern@example.org").expect("valid email"),
    )
    .with_about_me("botanist")
    .with_skills("rust, gardening");

    assert_eq!(account.about_me(), Some("botanist"));
    assert_eq!(account.skills(), Some("rust, gardening"));
}
