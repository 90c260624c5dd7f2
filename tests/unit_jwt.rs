use saasbase::config::jwt::JwtConfig;
use saasbase::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn config(secret: &str) -> JwtConfig {
    JwtConfig {
        secret: secret.to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_roundtrip() {
    let jwt_config = config("test-secret");
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "ann@x.com", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "ann@x.com");
    assert_eq!(claims.exp, claims.iat + 3600);
}

#[test]
fn test_token_rejected_with_wrong_secret() {
    let token = create_access_token(Uuid::new_v4(), "ann@x.com", &config("secret-a")).unwrap();

    assert!(verify_token(&token, &config("secret-b")).is_err());
}

#[test]
fn test_expired_token_rejected() {
    let jwt_config = JwtConfig {
        secret: "test-secret".to_string(),
        // Far enough in the past to clear jsonwebtoken's default leeway.
        access_token_expiry: -3600,
    };

    let token = create_access_token(Uuid::new_v4(), "ann@x.com", &jwt_config).unwrap();

    assert!(verify_token(&token, &jwt_config).is_err());
}

#[test]
fn test_garbage_token_rejected() {
    assert!(verify_token("not.a.jwt", &config("test-secret")).is_err());
}
