//! LinkService tests
//!
//! Visibility, ownership and uniqueness rules of the link repository, run
//! against temporary SQLite databases.

use std::sync::Arc;

use chrono::{Duration, Utc};
use shortkey::auth::{Caller, Role};
use shortkey::errors::ShortkeyError;
use shortkey::services::{CreateLinkRequest, LinkService};
use shortkey::storage::SeaOrmStorage;
use tempfile::TempDir;

async fn create_temp_service() -> (LinkService, Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("links.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let service = LinkService::with_symbol_length(storage.clone(), 6);
    (service, storage, temp_dir)
}

fn user(token: &str) -> Caller {
    Caller::new(token, Role::User)
}

fn admin() -> Caller {
    Caller::new("root-token", Role::Admin)
}

fn request(symbol: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        symbol: Some(symbol.to_string()),
        destination: "https://example.com".to_string(),
        expiry: None,
    }
}

// =============================================================================
// 创建
// =============================================================================

#[cfg(test)]
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_records_owner() {
        let (service, _storage, _temp) = create_temp_service().await;

        let result = service.create(request("abc"), &user("t1")).await.unwrap();
        assert!(!result.generated_symbol);
        assert_eq!(result.link.symbol, "abc");
        assert_eq!(result.link.destination, "https://example.com/");
        assert_eq!(result.link.owner_token.as_deref(), Some("t1"));
        assert!(!result.link.deleted);
        assert!(result.link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_second_create_conflicts() {
        let (service, _storage, _temp) = create_temp_service().await;

        service.create(request("abc"), &user("t1")).await.unwrap();
        let err = service.create(request("abc"), &user("t2")).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::Conflict(_)));

        // 管理员也一样
        let err = service.create(request("abc"), &admin()).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_concurrent_creates_exactly_one_wins() {
        let (service, _storage, _temp) = create_temp_service().await;

        let (first, second) = (user("t1"), user("t2"));
        let (a, b) = tokio::join!(
            service.create(request("race"), &first),
            service.create(request("race"), &second),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(failure, ShortkeyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_symbol_is_generated() {
        let (service, _storage, _temp) = create_temp_service().await;

        for symbol in [None, Some(String::new())] {
            let req = CreateLinkRequest {
                symbol,
                destination: "https://example.com/generated".to_string(),
                expiry: None,
            };
            let result = service.create(req, &user("t1")).await.unwrap();
            assert!(result.generated_symbol);
            assert_eq!(result.link.symbol.len(), 6);
            assert!(result.link.symbol.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[tokio::test]
    async fn test_generated_length_depends_on_role() {
        let (service, _storage, _temp) = create_temp_service().await;
        let service = service.with_admin_symbol_length(4);

        let with_symbol = |symbol: Option<String>| CreateLinkRequest {
            symbol,
            destination: "https://example.com/".to_string(),
            expiry: None,
        };

        let admin_link = service.create(with_symbol(None), &admin()).await.unwrap();
        assert_eq!(admin_link.link.symbol.len(), 4);

        let user_link = service.create(with_symbol(None), &user("t1")).await.unwrap();
        assert_eq!(user_link.link.symbol.len(), 6);

        // 用户自己指定的短码原样保存，不补齐
        let chosen = service
            .create(with_symbol(Some("ab".to_string())), &user("t1"))
            .await
            .unwrap();
        assert_eq!(chosen.link.symbol, "ab");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let (service, _storage, _temp) = create_temp_service().await;
        let caller = user("t1");

        let too_long = "x".repeat(129);
        for bad in ["links", "a b", "slash/ed", too_long.as_str()] {
            let err = service.create(request(bad), &caller).await.unwrap_err();
            assert!(matches!(err, ShortkeyError::BadInput(_)), "{} accepted", bad);
        }

        for destination in ["", "ftp://example.com", "javascript:alert(1)", "example.com"] {
            let req = CreateLinkRequest {
                destination: destination.to_string(),
                ..request("ok")
            };
            let err = service.create(req, &caller).await.unwrap_err();
            assert!(matches!(err, ShortkeyError::BadInput(_)), "{} accepted", destination);
        }

        let req = CreateLinkRequest {
            expiry: Some("tomorrow".to_string()),
            ..request("ok")
        };
        let err = service.create(req, &caller).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::BadInput(_)));
    }

    #[tokio::test]
    async fn test_expiry_formats() {
        let (service, _storage, _temp) = create_temp_service().await;
        // 数据库可能截断亚秒精度
        let before = Utc::now() - Duration::seconds(1);

        let relative = CreateLinkRequest {
            expiry: Some("1d12h".to_string()),
            ..request("rel")
        };
        let link = service.create(relative, &user("t1")).await.unwrap().link;
        let delta = link.expires_at.unwrap() - before;
        assert!(delta >= Duration::hours(36) - Duration::seconds(1));
        assert!(delta < Duration::hours(36) + Duration::minutes(1));

        // 过去的时间也接受
        let past = CreateLinkRequest {
            expiry: Some("2020-01-01T00:00:00Z".to_string()),
            ..request("past")
        };
        let link = service.create(past, &user("t1")).await.unwrap().link;
        assert_eq!(link.expires_at.unwrap().to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create() {
        let (service, storage, _temp) = create_temp_service().await;

        let err = service
            .create(request("abc"), &Caller::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, ShortkeyError::Unauthorized(_)));
        assert!(storage.find_link("abc", shortkey::storage::LinkScope::All).await.unwrap().is_none());
    }
}

// =============================================================================
// 读取与可见性
// =============================================================================

#[cfg(test)]
mod visibility_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_admin_never_sees_deleted_or_expired() {
        let (service, _storage, _temp) = create_temp_service().await;
        let owner = user("t1");

        service.create(request("live"), &owner).await.unwrap();
        service
            .create(
                CreateLinkRequest {
                    expiry: Some((Utc::now() - Duration::minutes(1)).to_rfc3339()),
                    ..request("expired")
                },
                &owner,
            )
            .await
            .unwrap();
        service.create(request("trashed"), &user("t2")).await.unwrap();
        service.soft_delete_all(&user("t2")).await.unwrap();

        let visible = service.list_visible(&owner).await.unwrap();
        assert!(visible.iter().all(|l| !l.deleted));
        assert!(visible.iter().all(|l| l.is_live_at(Utc::now())));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].symbol, "live");

        let everything = service.list_visible(&admin()).await.unwrap();
        let symbols: Vec<&str> = everything.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["live", "expired", "trashed"]);

        assert!(matches!(
            service.get_by_symbol("expired", &owner).await,
            Err(ShortkeyError::NotFound(_))
        ));
        assert!(service.get_by_symbol("expired", &admin()).await.is_ok());
        assert!(service.get_by_symbol("trashed", &admin()).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_anonymous_management_is_unauthorized() {
        let (service, _storage, _temp) = create_temp_service().await;
        service.create(request("abc"), &user("t1")).await.unwrap();
        let anon = Caller::anonymous();

        assert!(matches!(
            service.list_visible(&anon).await,
            Err(ShortkeyError::Unauthorized(_))
        ));
        assert!(matches!(
            service.get_by_symbol("abc", &anon).await,
            Err(ShortkeyError::Unauthorized(_))
        ));
        assert!(matches!(service.check_access(&anon), Err(ShortkeyError::Unauthorized(_))));
        assert!(matches!(
            service.soft_delete_all(&anon).await,
            Err(ShortkeyError::Unauthorized(_))
        ));
        // 不存在的链接同样是 401，不泄露存在性
        for symbol in ["abc", "missing"] {
            assert!(matches!(
                service.hard_delete(symbol, &anon).await,
                Err(ShortkeyError::Unauthorized(_))
            ));
        }

        // 跳转不受影响
        assert_eq!(service.resolve_redirect("abc").await.unwrap().symbol, "abc");
    }
}

// =============================================================================
// 删除
// =============================================================================

#[cfg(test)]
mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_owner_hard_delete_is_unauthorized() {
        let (service, _storage, _temp) = create_temp_service().await;
        service.create(request("abc"), &user("t1")).await.unwrap();

        let err = service.hard_delete("abc", &user("t2")).await.unwrap_err();
        assert!(matches!(err, ShortkeyError::Unauthorized(_)));

        // 所有者仍能取回
        assert!(service.get_by_symbol("abc", &user("t1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_hard_delete_is_idempotent_not_found() {
        let (service, storage, _temp) = create_temp_service().await;
        service.create(request("abc"), &user("t1")).await.unwrap();

        service.hard_delete("abc", &user("t1")).await.unwrap();
        for _ in 0..3 {
            assert!(matches!(
                service.hard_delete("abc", &user("t1")).await,
                Err(ShortkeyError::NotFound(_))
            ));
        }
        assert_eq!(
            storage.count_links(shortkey::storage::LinkScope::All).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_admin_hard_deletes_anything() {
        let (service, _storage, _temp) = create_temp_service().await;
        service.create(request("abc"), &user("t1")).await.unwrap();
        service.soft_delete_all(&user("t1")).await.unwrap();

        // 软删除后普通用户看不到，管理员仍可物理删除
        assert!(matches!(
            service.hard_delete("abc", &user("t1")).await,
            Err(ShortkeyError::NotFound(_))
        ));
        service.hard_delete("abc", &admin()).await.unwrap();
        assert!(matches!(
            service.get_by_symbol("abc", &admin()).await,
            Err(ShortkeyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_bulk_delete_scopes() {
        let (service, _storage, _temp) = create_temp_service().await;
        service.create(request("a1"), &user("t1")).await.unwrap();
        service.create(request("a2"), &user("t1")).await.unwrap();
        service.create(request("b1"), &user("t2")).await.unwrap();
        service.create(request("c1"), &admin()).await.unwrap();

        assert_eq!(service.soft_delete_all(&user("t1")).await.unwrap(), 2);

        let remaining: Vec<String> = service
            .list_visible(&user("t2"))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.symbol)
            .collect();
        assert_eq!(remaining, vec!["b1", "c1"]);

        assert_eq!(service.soft_delete_all(&admin()).await.unwrap(), 2);
        assert!(service.list_visible(&user("t2")).await.unwrap().is_empty());
        assert_eq!(service.list_visible(&admin()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_redirect_ignores_deleted_and_expired() {
        let (service, _storage, _temp) = create_temp_service().await;
        service.create(request("abc"), &user("t1")).await.unwrap();
        service
            .create(
                CreateLinkRequest {
                    expiry: Some((Utc::now() - Duration::seconds(1)).to_rfc3339()),
                    ..request("old")
                },
                &user("t1"),
            )
            .await
            .unwrap();

        assert_eq!(
            service.resolve_redirect("abc").await.unwrap().destination,
            "https://example.com/"
        );
        assert!(matches!(
            service.resolve_redirect("old").await,
            Err(ShortkeyError::NotFound(_))
        ));

        service.soft_delete_all(&user("t1")).await.unwrap();
        assert!(matches!(
            service.resolve_redirect("abc").await,
            Err(ShortkeyError::NotFound(_))
        ));
    }
}
