use nms_auth::{AuthError, JwtVerifier};

#[test]
fn jwt_issue_and_verify() {
    let jwt = JwtVerifier::new("secret".to_string());

    let token = jwt.issue("client-1", 3600).expect("token");
    let subject = jwt.verify(&token).expect("subject");
    assert_eq!(subject, "client-1");
}

#[test]
fn wrong_secret_is_invalid() {
    let issuer = JwtVerifier::new("secret".to_string());
    let verifier = JwtVerifier::new("other-secret".to_string());

    let token = issuer.issue("client-1", 3600).expect("token");
    assert!(matches!(
        verifier.verify(&token),
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(
        verifier.verify("not-a-jwt"),
        Err(AuthError::TokenInvalid)
    ));
}
