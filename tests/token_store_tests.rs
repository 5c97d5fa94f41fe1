//! TokenStore tests
//!
//! Token resolution must never fail: unknown tokens and storage errors both
//! degrade to the anonymous role.

use std::sync::Arc;

use migration::entities::token;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use shortkey::auth::{Caller, Role, TokenRef, TokenStore};
use shortkey::errors::ShortkeyError;
use shortkey::storage::SeaOrmStorage;
use tempfile::TempDir;

async fn create_temp_store() -> (TokenStore, Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("tokens.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    (TokenStore::new(storage.clone()), storage, temp_dir)
}

// =============================================================================
// 解析
// =============================================================================

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_and_unknown_tokens_are_anonymous() {
        let (store, _storage, _temp) = create_temp_store().await;

        assert_eq!(store.resolve(None).await, Role::Anonymous);
        assert_eq!(store.resolve(Some("")).await, Role::Anonymous);
        assert_eq!(store.resolve(Some("no-such-token")).await, Role::Anonymous);
        assert_eq!(
            store.resolve_caller(Some("no-such-token")).await,
            Caller::anonymous()
        );
    }

    #[tokio::test]
    async fn test_issued_tokens_resolve_to_their_role() {
        let (store, _storage, _temp) = create_temp_store().await;

        let user = store.issue(Role::User, "alice").await.unwrap();
        let admin = store.issue(Role::Admin, "ops").await.unwrap();
        assert_eq!(user.value.len(), 42);
        assert_ne!(user.value, admin.value);

        assert_eq!(store.resolve(Some(&user.value)).await, Role::User);
        assert_eq!(store.resolve(Some(&admin.value)).await, Role::Admin);

        let caller = store.resolve_caller(Some(&user.value)).await;
        assert_eq!(caller.token.as_deref(), Some(user.value.as_str()));
        assert_eq!(caller.role, Role::User);
    }

    #[tokio::test]
    async fn test_token_match_is_exact() {
        let (store, _storage, _temp) = create_temp_store().await;
        let token = store.issue(Role::User, "").await.unwrap();

        let upper = token.value.to_uppercase();
        if upper != token.value {
            assert_eq!(store.resolve(Some(&upper)).await, Role::Anonymous);
        }
        let prefix = &token.value[..10];
        assert_eq!(store.resolve(Some(prefix)).await, Role::Anonymous);
    }

    #[tokio::test]
    async fn test_stored_levels_map_onto_roles() {
        let (store, storage, _temp) = create_temp_store().await;

        for (value, level, expected) in [
            ("level-zero", 0i16, Role::Anonymous),
            ("level-two", 2, Role::User),
            ("level-nine", 9, Role::Admin),
        ] {
            token::ActiveModel {
                token: Set(value.to_string()),
                role: Set(level),
                description: Set(String::new()),
                ..Default::default()
            }
            .insert(storage.get_db())
            .await
            .unwrap();

            assert_eq!(store.resolve(Some(value)).await, expected, "level {}", level);
        }

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[1].level, 2);
        assert_eq!(listed[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_storage_failure_degrades_to_anonymous() {
        let (store, storage, _temp) = create_temp_store().await;
        let admin = store.issue(Role::Admin, "").await.unwrap();

        storage
            .get_db()
            .execute_unprepared("DROP TABLE tokens")
            .await
            .unwrap();

        assert_eq!(store.resolve(Some(&admin.value)).await, Role::Anonymous);
    }
}

// =============================================================================
// 签发与撤销
// =============================================================================

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_revocation_is_immediate() {
        let (store, _storage, _temp) = create_temp_store().await;
        let token = store.issue(Role::Admin, "temp").await.unwrap();
        assert_eq!(store.resolve(Some(&token.value)).await, Role::Admin);

        store.revoke(&token.value).await.unwrap();
        assert_eq!(store.resolve(Some(&token.value)).await, Role::Anonymous);

        let err = store.revoke(&token.value).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_revoke_by_listed_id() {
        let (store, _storage, _temp) = create_temp_store().await;
        let keep = store.issue(Role::User, "keep").await.unwrap();
        let lost = store.issue(Role::User, "lost").await.unwrap();

        // 只凭 `token list` 中的 id 撤销，不需要完整值
        let id_ref: TokenRef = format!("#{}", lost.id).parse().unwrap();
        store.revoke_ref(&id_ref).await.unwrap();

        assert_eq!(store.resolve(Some(&lost.value)).await, Role::Anonymous);
        assert_eq!(store.resolve(Some(&keep.value)).await, Role::User);
        assert!(matches!(
            store.revoke_ref(&id_ref).await,
            Err(ShortkeyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_anonymous_tokens_are_not_issued() {
        let (store, _storage, _temp) = create_temp_store().await;

        let err = store.issue(Role::Anonymous, "").await.unwrap_err();
        assert!(matches!(err, ShortkeyError::BadInput(_)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_keeps_value_and_masked_hides_tail() {
        let (store, _storage, _temp) = create_temp_store().await;
        let token = store.issue(Role::User, "ci").await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value, token.value);
        assert_eq!(listed[0].description, "ci");
        assert!(!listed[0].masked().contains(&token.value[6..]));
    }
}
