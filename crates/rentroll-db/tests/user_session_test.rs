//! Integration tests for User and Session repository implementations
//! using in-memory SurrealDB.

use chrono::{Duration, Utc};
use rentroll_core::error::RentRollError;
use rentroll_core::models::session::CreateSession;
use rentroll_core::models::user::CreateUser;
use rentroll_core::repository::{SessionRepository, UserRepository};
use rentroll_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentroll_db::run_migrations(&db).await.unwrap();
    db
}

fn user(email: &str) -> CreateUser {
    CreateUser {
        email: email.into(),
        password: "hunter22".into(),
        role: None,
    }
}

fn session(user_id: Uuid, token_hash: &str, expires_in: Duration) -> CreateSession {
    CreateSession {
        user_id,
        token_hash: token_hash.into(),
        csrf_token: format!("csrf-{token_hash}"),
        expires_at: Utc::now() + expires_in,
    }
}

#[tokio::test]
async fn create_user_lowercases_email_and_hashes_password() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo.create(user("Staff@Example.com")).await.unwrap();

    assert_eq!(created.email, "staff@example.com");
    assert_eq!(created.role, "member");
    assert!(created.password_hash.starts_with("$argon2id$"));
    assert_ne!(created.password_hash, "hunter22");

    let by_email = repo.get_by_email("STAFF@example.com").await.unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn duplicate_email_is_already_exists() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(user("staff@example.com")).await.unwrap();
    let err = repo.create(user("Staff@example.com")).await.unwrap_err();
    assert!(matches!(err, RentRollError::AlreadyExists { .. }));
}

#[tokio::test]
async fn unknown_email_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    assert!(
        repo.get_by_email("nobody@example.com")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn session_lookup_and_invalidate() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let sessions = SurrealSessionRepository::new(db);
    let u = users.create(user("staff@example.com")).await.unwrap();

    let created = sessions
        .create(session(u.id, "abc", Duration::hours(1)))
        .await
        .unwrap();
    let fetched = sessions.get_by_token_hash("abc").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.user_id, u.id);
    assert_eq!(fetched.csrf_token, "csrf-abc");

    sessions.invalidate(created.id).await.unwrap();
    assert!(
        sessions
            .get_by_token_hash("abc")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn cleanup_removes_only_expired_sessions() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let sessions = SurrealSessionRepository::new(db);
    let u = users.create(user("staff@example.com")).await.unwrap();

    sessions
        .create(session(u.id, "old", Duration::hours(-1)))
        .await
        .unwrap();
    sessions
        .create(session(u.id, "live", Duration::hours(1)))
        .await
        .unwrap();

    assert_eq!(sessions.cleanup_expired().await.unwrap(), 1);
    assert!(sessions.get_by_token_hash("live").await.is_ok());
    assert!(sessions.get_by_token_hash("old").await.is_err());
}
