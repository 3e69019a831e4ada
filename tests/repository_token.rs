use restaurant_service::domain::repositories::TokenRepository;
use restaurant_service::error::AppError;
use restaurant_service::infrastructure::persistence::PgTokenRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token(42, "test-token", "hash123").await.unwrap();

    assert_eq!(token.user_id, 42);
    assert_eq!(token.name, "test-token");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_duplicate_name_conflicts(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(1, "same-name", "hash-a").await.unwrap();
    let result = repo.create_token(2, "same-name", "hash-b").await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_active_by_hash(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let created = repo.create_token(7, "active", "activehash").await.unwrap();

    let found = repo.find_active_by_hash("activehash").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.user_id, 7);

    assert!(repo.find_active_by_hash("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_revoked_token_is_not_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token(1, "revoked", "revokedhash").await.unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active_by_hash("revokedhash").await.unwrap().is_none());

    let stored = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(stored.is_revoked());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    let token = repo.create_token(1, "update-token", "updatehash").await.unwrap();

    repo.update_last_used("updatehash").await.unwrap();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE id = $1")
            .bind(token.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(last_used.is_some());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_and_find_tokens(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(1, "token1", "hash1").await.unwrap();
    repo.create_token(2, "token2", "hash2").await.unwrap();

    let tokens = repo.list_tokens().await.unwrap();
    assert_eq!(tokens.len(), 2);

    let by_name = repo.find_by_name("token2").await.unwrap().unwrap();
    assert_eq!(by_name.user_id, 2);

    assert!(repo.find_by_name("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_revoke_already_revoked(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token(1, "double-revoke", "doublehash")
        .await
        .unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let result = repo.revoke_token(token.id).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}
