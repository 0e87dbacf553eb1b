mod common;

use chrono::Duration;
use common::{auth_service, test_db, TEST_SECRET};
use gateway::db::repositories::{UserQuery, UserRepository};
use gateway::services::{AuthService, JwtManager};
use gateway::GatewayError;

#[tokio::test]
async fn test_signup_then_login_then_verify() {
    let db = test_db().await;
    let auth = auth_service(&db);

    let user = auth.signup("alice", "password123").await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.password_digest.starts_with("$argon2id$"));

    let issued = auth.login("alice", "password123").await.unwrap();
    let user_id = auth.verify(&issued.token).await.unwrap();
    assert_eq!(user_id, user.id);
}

#[tokio::test]
async fn test_duplicate_signup_rejected() {
    let db = test_db().await;
    let auth = auth_service(&db);

    auth.signup("alice", "password123").await.unwrap();
    let err = auth.signup("alice", "another-password").await.unwrap_err();
    assert!(matches!(err, GatewayError::DuplicateUser(ref name) if name == "alice"));

    let users = UserRepository::find_by(db.pool(), &UserQuery::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let db = test_db().await;
    let auth = auth_service(&db);
    auth.signup("alice", "password123").await.unwrap();

    let err = auth.login("alice", "password124").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidCredentials));
}

#[tokio::test]
async fn test_unknown_user_rejected() {
    let db = test_db().await;
    let auth = auth_service(&db);

    let err = auth.login("nobody", "password123").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidCredentials));
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let db = test_db().await;
    let auth = AuthService::new(
        db.clone(),
        JwtManager::new(TEST_SECRET, Duration::seconds(-60)).unwrap(),
    );
    auth.signup("alice", "password123").await.unwrap();

    let issued = auth.login("alice", "password123").await.unwrap();
    let err = auth.verify(&issued.token).await.unwrap_err();
    assert!(matches!(err, GatewayError::Unauthorized(_)));
}

#[tokio::test]
async fn test_token_signed_elsewhere_rejected() {
    let db = test_db().await;
    let auth = auth_service(&db);
    let foreign = JwtManager::new("some-other-secret-that-is-long-enough", Duration::hours(1)).unwrap();

    let token = foreign.generate_token("user-1").unwrap().token;
    assert!(matches!(
        auth.verify(&token).await,
        Err(GatewayError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_concurrent_signup_yields_one_user() {
    let db = test_db().await;
    let auth = auth_service(&db);

    let (first, second) = tokio::join!(
        auth.signup("alice", "password123"),
        auth.signup("alice", "password456"),
    );

    let outcomes = [first, second];
    let created = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| matches!(r, Err(GatewayError::DuplicateUser(name)) if name == "alice"))
        .count();
    assert_eq!((created, duplicates), (1, 1));

    let users = UserRepository::find_by(db.pool(), &UserQuery::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_alike() {
    let db = test_db().await;
    let auth = auth_service(&db);
    auth.signup("alice", "password123").await.unwrap();

    let unknown = auth.login("nobody", "password123").await.unwrap_err();
    let wrong = auth.login("alice", "password124").await.unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
}
