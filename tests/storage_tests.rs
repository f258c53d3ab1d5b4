//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use std::collections::HashSet;
use std::sync::Arc;

use linkboard::config::DatabaseConfig;
use linkboard::errors::LinkboardError;
use linkboard::storage::{LinkStore, NewLink, SeaOrmStorage, StorageFactory};
use tempfile::TempDir;

fn sqlite_url(dir: &TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display())
}

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        database_url: sqlite_url(&temp_dir),
        pool_size: 4,
    };

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    storage.migrate().await.expect("Failed to run migrations");

    (storage, temp_dir)
}

fn id_set(links: &[linkboard::storage::Link]) -> HashSet<i64> {
    links.iter().map(|l| l.id).collect()
}

// =============================================================================
// create / get / list
// =============================================================================

#[tokio::test]
async fn test_create_and_get_link() {
    let (storage, _dir) = create_temp_storage().await;

    let id = storage
        .create_link(
            NewLink::new("Rust", "https://www.rust-lang.org")
                .with_category("Dev")
                .with_colour("#dea584"),
        )
        .await
        .unwrap();

    let link = storage.get_link(id).await.unwrap();
    assert_eq!(link.id, id);
    assert_eq!(link.name, "Rust");
    assert_eq!(link.url, "https://www.rust-lang.org");
    assert_eq!(link.category.as_deref(), Some("Dev"));
    assert_eq!(link.colour.as_deref(), Some("#dea584"));
    assert_eq!(link.icon, None);
    assert_eq!(link.hit_count, 0);

    storage.close().await;
}

#[tokio::test]
async fn test_ids_are_unique_and_listed_in_insertion_order() {
    let (storage, _dir) = create_temp_storage().await;

    let mut ids = Vec::new();
    for name in ["c", "a", "b"] {
        ids.push(
            storage
                .create_link(NewLink::new(name, format!("https://{}.example.com", name)))
                .await
                .unwrap(),
        );
    }

    let listed: Vec<i64> = storage
        .list_links()
        .await
        .unwrap()
        .iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(listed, ids);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_create_rejects_blank_name_or_url() {
    let (storage, _dir) = create_temp_storage().await;

    let err = storage
        .create_link(NewLink::new("Docs", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkboardError::Validation(_)));

    let err = storage
        .create_link(NewLink::new("", "https://docs.rs"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkboardError::Validation(_)));

    assert!(storage.list_links().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_link_is_not_found() {
    let (storage, _dir) = create_temp_storage().await;

    let err = storage.get_link(42).await.unwrap_err();
    assert!(matches!(err, LinkboardError::NotFound(_)));
}

// =============================================================================
// record_hit
// =============================================================================

#[tokio::test]
async fn test_record_hit_increments() {
    let (storage, _dir) = create_temp_storage().await;
    let id = storage
        .create_link(NewLink::new("Docs", "https://docs.rs"))
        .await
        .unwrap();

    storage.record_hit(id).await.unwrap();
    storage.record_hit(id).await.unwrap();

    assert_eq!(storage.get_link(id).await.unwrap().hit_count, 2);
}

#[tokio::test]
async fn test_record_hit_unknown_id_is_not_found() {
    let (storage, _dir) = create_temp_storage().await;

    let err = storage.record_hit(999).await.unwrap_err();
    assert!(matches!(err, LinkboardError::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_record_hit_loses_no_updates() {
    const N: i64 = 50;
    let (storage, _dir) = create_temp_storage().await;
    let id = storage
        .create_link(NewLink::new("Docs", "https://docs.rs"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.record_hit(id).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(storage.get_link(id).await.unwrap().hit_count, N);
}

// =============================================================================
// search
// =============================================================================

async fn seed_search_links(storage: &SeaOrmStorage) {
    storage
        .create_link(NewLink::new("GitHub", "https://github.com").with_category("Dev"))
        .await
        .unwrap();
    storage
        .create_link(NewLink::new("Grafana", "https://grafana.local").with_category("Monitoring"))
        .await
        .unwrap();
    storage
        .create_link(NewLink::new("Weather", "https://weather.example.com/50%_off"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_search_equals_list() {
    let (storage, _dir) = create_temp_storage().await;
    seed_search_links(&storage).await;

    let all = storage.list_links().await.unwrap();
    assert_eq!(id_set(&storage.search_links("").await.unwrap()), id_set(&all));
    assert_eq!(id_set(&storage.search_links("   ").await.unwrap()), id_set(&all));
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_fields() {
    let (storage, _dir) = create_temp_storage().await;
    seed_search_links(&storage).await;

    let by_name = storage.search_links("GITHUB").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "GitHub");

    let by_url = storage.search_links("grafana.LOCAL").await.unwrap();
    assert_eq!(by_url.len(), 1);
    assert_eq!(by_url[0].name, "Grafana");

    let by_category = storage.search_links("monitor").await.unwrap();
    assert_eq!(by_category.len(), 1);

    assert!(storage.search_links("nothing-matches").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (storage, _dir) = create_temp_storage().await;
    seed_search_links(&storage).await;

    let percent = storage.search_links("%").await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "Weather");

    let underscore = storage.search_links("0%_").await.unwrap();
    assert_eq!(underscore.len(), 1);

    assert!(storage.search_links("G_tHub").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let (storage, _dir) = create_temp_storage().await;
    storage
        .create_link(NewLink::new("École", "https://ecole.example.com"))
        .await
        .unwrap();
    storage
        .create_link(NewLink::new("Ärzte", "https://aerzte.example.com").with_category("Gesundheit"))
        .await
        .unwrap();

    for term in ["École", "école", "ÉCOLE"] {
        let hits = storage.search_links(term).await.unwrap();
        assert_eq!(hits.len(), 1, "term {:?}", term);
        assert_eq!(hits[0].name, "École");
    }

    let hits = storage.search_links("Ärz").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Ärzte");
    assert_eq!(storage.search_links("ärz").await.unwrap().len(), 1);

    // ASCII 关键词仍然匹配含非 ASCII 字符的名称
    assert_eq!(storage.search_links("COLE").await.unwrap().len(), 1);
    assert!(storage.search_links("Über").await.unwrap().is_empty());
}

// =============================================================================
// migrations / backend
// =============================================================================

#[tokio::test]
async fn test_migrations_are_idempotent_and_data_survives_reopen() {
    let (storage, dir) = create_temp_storage().await;
    let id = storage
        .create_link(NewLink::new("Docs", "https://docs.rs"))
        .await
        .unwrap();

    storage.migrate().await.expect("second migrate must be a no-op");
    storage.close().await;

    let reopened = SeaOrmStorage::connect(&sqlite_url(&dir), "sqlite", 2)
        .await
        .unwrap();
    reopened.migrate().await.unwrap();
    assert_eq!(reopened.get_link(id).await.unwrap().name, "Docs");
    reopened.close().await;
}

#[tokio::test]
async fn test_backend_name() {
    let (storage, _dir) = create_temp_storage().await;
    assert_eq!(storage.backend_name(), "sqlite");
}

#[tokio::test]
async fn test_factory_rejects_unknown_scheme() {
    let config = DatabaseConfig {
        database_url: "redis://localhost:6379".to_string(),
        pool_size: 1,
    };
    let err = StorageFactory::create(&config).await.err().unwrap();
    assert!(matches!(err, LinkboardError::DatabaseConfig(_)));
}
