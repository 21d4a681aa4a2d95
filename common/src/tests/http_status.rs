use crate::HttpStatusCode;

/// **VALUE**: Verifies the success range used when classifying upstream responses.
///
/// **BUG THIS CATCHES**: Off-by-one range bounds (e.g. 300 reported as success).
#[test]
fn given_status_codes_when_classified_then_only_2xx_is_success() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(199).is_success());
    assert!(!HttpStatusCode(300).is_success());
    assert!(!HttpStatusCode(503).is_success());
}

/// **VALUE**: 401/403 are flagged as credential rejections.
///
/// **WHY THIS MATTERS**: Partial credentials degrade silently to no auth; the only place the
/// misconfiguration shows up is an upstream 401/403.
#[test]
fn given_auth_status_when_checked_then_flagged_as_auth_rejection() {
    assert!(HttpStatusCode(401).is_auth_rejection());
    assert!(HttpStatusCode(403).is_auth_rejection());
    assert!(!HttpStatusCode(404).is_auth_rejection());
    assert_eq!(HttpStatusCode::from(503).to_string(), "503");
}
