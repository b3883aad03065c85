use studyhub::middleware::auth::AuthUser;
use studyhub::studyhub_auth::{Claims, create_access_token, verify_token};
use studyhub::studyhub_config::JwtConfig;
use studyhub::studyhub_core::ErrorKind;
use studyhub::studyhub_models::users::Role;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_resolves_to_user_id() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in [Role::Admin, Role::Cr, Role::Student] {
        let token = create_access_token(user_id, "test@example.com", role, &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.role, role);

        let auth_user = AuthUser(claims);
        assert_eq!(auth_user.user_id().unwrap().into_inner(), user_id);
        assert_eq!(auth_user.email(), "test@example.com");
    }
}

#[test]
fn test_garbage_subject_is_unauthenticated() {
    let auth_user = AuthUser(Claims {
        sub: "not-a-uuid".to_string(),
        email: "test@example.com".to_string(),
        role: Role::Student,
        exp: 9999999999,
        iat: 1234567890,
    });

    let err = auth_user.user_id().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[test]
fn test_token_from_other_secret_is_rejected() {
    let token = create_access_token(
        Uuid::new_v4(),
        "test@example.com",
        Role::Student,
        &get_test_jwt_config(),
    )
    .unwrap();

    let other = JwtConfig {
        secret: "a_different_secret".to_string(),
        access_token_expiry: 3600,
    };

    let err = verify_token(&token, &other).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}
