//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use chrono::{Duration, Utc};
use shortkey::auth::Role;
use shortkey::errors::ShortkeyError;
use shortkey::storage::backend::{
    LinkScope, SeaOrmStorage, connect_sqlite, infer_backend_from_url, run_migrations,
};
use shortkey::storage::NewLink;
use tempfile::TempDir;

fn new_link(symbol: &str, owner: Option<&str>) -> NewLink {
    NewLink {
        symbol: symbol.to_string(),
        destination: format!("https://{}.example.com", symbol),
        expires_at: None,
        owner_token: owner.map(str::to_string),
    }
}

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

// =============================================================================
// 连接测试
// =============================================================================

#[cfg(test)]
mod connection_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_sqlite_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("new_db.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let conn = connect_sqlite(&db_url).await;
        assert!(conn.is_ok(), "Should connect to SQLite: {:?}", conn.err());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_in_memory_storage_keeps_schema() {
        let storage = SeaOrmStorage::new("sqlite::memory:", "sqlite")
            .await
            .expect("in-memory storage");

        storage.insert_link(new_link("mem", None)).await.unwrap();
        assert_eq!(storage.count_links(LinkScope::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_migrations_twice() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("migration_test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let conn = connect_sqlite(&db_url).await.unwrap();
        run_migrations(&conn).await.expect("first run");
        run_migrations(&conn).await.expect("second run is a no-op");
    }

    #[tokio::test]
    async fn test_storage_new_empty_url_fails() {
        let result = SeaOrmStorage::new("", "sqlite").await;
        assert!(matches!(result, Err(ShortkeyError::DatabaseConfig(_))));
    }

    #[test]
    fn test_infer_unknown_returns_error() {
        assert!(infer_backend_from_url("unknown://something").is_err());
    }
}

// =============================================================================
// 唯一性测试
// =============================================================================

#[cfg(test)]
mod uniqueness_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_live_symbol_conflicts() {
        let (storage, _temp) = create_temp_storage().await;

        storage.insert_link(new_link("abc", None)).await.unwrap();
        let err = storage.insert_link(new_link("abc", None)).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_symbols_are_case_sensitive() {
        let (storage, _temp) = create_temp_storage().await;

        storage.insert_link(new_link("abc", None)).await.unwrap();
        storage
            .insert_link(new_link("ABC", None))
            .await
            .expect("different case is a different symbol");
    }

    #[tokio::test]
    async fn test_symbol_reusable_after_soft_delete() {
        let (storage, _temp) = create_temp_storage().await;

        let first = storage.insert_link(new_link("abc", Some("t1"))).await.unwrap();
        assert_eq!(storage.soft_delete_links(Some("t1"), Utc::now()).await.unwrap(), 1);

        let second = storage
            .insert_link(new_link("abc", Some("t1")))
            .await
            .expect("soft-deleted rows do not hold the symbol");
        assert_ne!(first.id, second.id);

        // 管理员视角优先返回未删除的那一行
        let found = storage.find_link("abc", LinkScope::All).await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert!(!found.deleted);

        assert_eq!(storage.count_links(LinkScope::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_admin_lookup_prefers_newest_deleted_row() {
        let (storage, _temp) = create_temp_storage().await;

        storage.insert_link(new_link("abc", None)).await.unwrap();
        storage.soft_delete_links(None, Utc::now()).await.unwrap();
        let newer = storage.insert_link(new_link("abc", None)).await.unwrap();
        storage.soft_delete_links(None, Utc::now()).await.unwrap();

        let found = storage.find_link("abc", LinkScope::All).await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
        assert!(found.deleted);
        assert!(found.deleted_at.is_some());
    }
}

// =============================================================================
// 可见性测试
// =============================================================================

#[cfg(test)]
mod scope_tests {
    use super::*;

    #[tokio::test]
    async fn test_live_scope_filters_deleted_and_expired() {
        let (storage, _temp) = create_temp_storage().await;
        let now = Utc::now();

        storage.insert_link(new_link("live", Some("t1"))).await.unwrap();
        storage
            .insert_link(NewLink {
                expires_at: Some(now + Duration::hours(1)),
                ..new_link("later", None)
            })
            .await
            .unwrap();
        storage
            .insert_link(NewLink {
                expires_at: Some(now - Duration::seconds(5)),
                ..new_link("expired", None)
            })
            .await
            .unwrap();
        storage.insert_link(new_link("gone", Some("t2"))).await.unwrap();
        storage.soft_delete_links(Some("t2"), now).await.unwrap();

        let live: Vec<String> = storage
            .list_links(LinkScope::Live { now })
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.symbol)
            .collect();
        assert_eq!(live, vec!["live", "later"]);

        let all: Vec<String> = storage
            .list_links(LinkScope::All)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.symbol)
            .collect();
        assert_eq!(all, vec!["live", "later", "expired", "gone"]);

        assert!(
            storage
                .find_link("expired", LinkScope::Live { now })
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .find_link("expired", LinkScope::All)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_soft_delete_scoped_to_owner() {
        let (storage, _temp) = create_temp_storage().await;

        storage.insert_link(new_link("a", Some("t1"))).await.unwrap();
        storage.insert_link(new_link("b", Some("t1"))).await.unwrap();
        storage.insert_link(new_link("c", Some("t2"))).await.unwrap();
        storage.insert_link(new_link("d", None)).await.unwrap();

        assert_eq!(storage.soft_delete_links(Some("t1"), Utc::now()).await.unwrap(), 2);
        // 已删除的不会再计数
        assert_eq!(storage.soft_delete_links(Some("t1"), Utc::now()).await.unwrap(), 0);

        let live = storage
            .list_links(LinkScope::Live { now: Utc::now() })
            .await
            .unwrap();
        let symbols: Vec<&str> = live.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["c", "d"]);

        assert_eq!(storage.soft_delete_links(None, Utc::now()).await.unwrap(), 2);
        assert_eq!(storage.count_links(LinkScope::Live { now: Utc::now() }).await.unwrap(), 0);
    }
}

// =============================================================================
// 删除与清理测试
// =============================================================================

#[cfg(test)]
mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_by_id_reports_rows() {
        let (storage, _temp) = create_temp_storage().await;

        let link = storage.insert_link(new_link("abc", None)).await.unwrap();
        assert_eq!(storage.delete_link_by_id(link.id).await.unwrap(), 1);
        assert_eq!(storage.delete_link_by_id(link.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_stale() {
        let (storage, _temp) = create_temp_storage().await;
        let now = Utc::now();
        let cutoff = now - Duration::days(5);

        storage
            .insert_link(NewLink {
                expires_at: Some(now - Duration::days(6)),
                ..new_link("old", None)
            })
            .await
            .unwrap();
        storage
            .insert_link(NewLink {
                expires_at: Some(now - Duration::days(1)),
                ..new_link("recent", None)
            })
            .await
            .unwrap();
        storage.insert_link(new_link("forever", None)).await.unwrap();
        storage.insert_link(new_link("trashed", Some("t1"))).await.unwrap();
        storage
            .soft_delete_links(Some("t1"), now - Duration::days(6))
            .await
            .unwrap();

        assert_eq!(storage.purge_stale(cutoff).await.unwrap(), 2);

        let remaining: Vec<String> = storage
            .list_links(LinkScope::All)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.symbol)
            .collect();
        assert_eq!(remaining, vec!["recent", "forever"]);

        assert_eq!(storage.purge_stale(cutoff).await.unwrap(), 0);
    }
}

// =============================================================================
// Token 测试
// =============================================================================

#[cfg(test)]
mod token_tests {
    use super::*;

    #[tokio::test]
    async fn test_token_crud() {
        let (storage, _temp) = create_temp_storage().await;

        let token = storage.insert_token("tok-1", Role::Admin, "ops").await.unwrap();
        assert_eq!(token.role, Role::Admin);
        assert_eq!(token.level, 3);

        let found = storage.find_token("tok-1").await.unwrap().unwrap();
        assert_eq!(found, token);
        assert!(storage.find_token("tok-2").await.unwrap().is_none());

        let err = storage
            .insert_token("tok-1", Role::User, "dup")
            .await
            .unwrap_err();
        assert!(matches!(err, ShortkeyError::Conflict(_)));

        assert_eq!(storage.list_tokens().await.unwrap().len(), 1);
        assert_eq!(storage.delete_token("tok-1").await.unwrap(), 1);
        assert_eq!(storage.delete_token("tok-1").await.unwrap(), 0);
    }
}
