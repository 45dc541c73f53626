//! Integration tests for the hit store backends
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests (needs DATABASE_URL)
//! - By default, both backends are tested

use beacon::models::{HitField, NewHit, StringCount};
use beacon::storage::{HitStore, PostgresStore, SqliteStore};
use std::sync::Arc;

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true, // Test all backends if not specified
    }
}

/// Helper to create SQLite test storage
async fn create_sqlite_store() -> Arc<dyn HitStore> {
    let store = SqliteStore::new("sqlite::memory:", 5).await.unwrap();
    store.init().await.unwrap();
    Arc::new(store)
}

/// Helper to create PostgreSQL test storage
async fn create_postgres_store() -> Option<Arc<dyn HitStore>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    let store = PostgresStore::new(&db_url, 5).await.ok()?;
    store.init().await.ok()?;
    Some(Arc::new(store))
}

/// Client ids unique per run so a shared Postgres database doesn't leak state between tests
fn unique_client(name: &str) -> String {
    format!("{name}-{}", uuid::Uuid::new_v4())
}

fn new_hit(client_id: &str, user_id: &str, page: &str, referer: &str) -> NewHit {
    NewHit {
        client_id: client_id.to_string(),
        user_id: user_id.to_string(),
        page: page.to_string(),
        referer: referer.to_string(),
    }
}

fn sorted(mut counts: Vec<StringCount>) -> Vec<StringCount> {
    counts.sort_by(|a, b| a.value.cmp(&b.value));
    counts
}

async fn check_count_distinct_users(store: Arc<dyn HitStore>) {
    let client = unique_client("uniques");

    assert_eq!(store.count_distinct_users(&client).await.unwrap(), 0);

    for user in ["alice", "bob", "alice", "carol", "alice", "bob"] {
        store
            .insert(&new_hit(&client, user, "/", "(direct)"))
            .await
            .unwrap();
    }

    assert_eq!(store.count_distinct_users(&client).await.unwrap(), 3);
}

async fn check_group_by_count(store: Arc<dyn HitStore>) {
    let client = unique_client("grouped");
    let other = unique_client("other");

    store.insert(&new_hit(&client, "u1", "/a", "(direct)")).await.unwrap();
    store.insert(&new_hit(&client, "u2", "/a", "http://x.com/")).await.unwrap();
    store.insert(&new_hit(&client, "u3", "/b", "http://x.com/")).await.unwrap();
    store.insert(&new_hit(&client, "u3", "", "http://x.com/")).await.unwrap();
    store.insert(&new_hit(&other, "u9", "/a", "(direct)")).await.unwrap();

    let referers = store
        .group_by_count(&client, HitField::Referer)
        .await
        .unwrap();
    assert_eq!(
        sorted(referers),
        vec![
            StringCount::new("(direct)", 1),
            StringCount::new("http://x.com/", 3),
        ]
    );

    let pages = store.group_by_count(&client, HitField::Page).await.unwrap();
    assert_eq!(
        sorted(pages),
        vec![
            StringCount::new("", 1),
            StringCount::new("/a", 2),
            StringCount::new("/b", 1),
        ]
    );

    let empty = store
        .group_by_count(&unique_client("nobody"), HitField::Page)
        .await
        .unwrap();
    assert!(empty.is_empty());
}

async fn check_concurrent_inserts(store: Arc<dyn HitStore>) {
    let client = unique_client("concurrent");
    let mut handles = vec![];

    for i in 0..40 {
        let store = Arc::clone(&store);
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert(&new_hit(&client, &format!("user{}", i % 8), "/", "(direct)"))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count_distinct_users(&client).await.unwrap(), 8);
    let referers = store
        .group_by_count(&client, HitField::Referer)
        .await
        .unwrap();
    assert_eq!(referers, vec![StringCount::new("(direct)", 40)]);
}

#[tokio::test]
async fn test_count_distinct_users_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_count_distinct_users(create_sqlite_store().await).await;
}

#[tokio::test]
async fn test_count_distinct_users_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(store) = create_postgres_store().await else {
        eprintln!("Skipping PostgreSQL test: DATABASE_URL not set");
        return;
    };
    check_count_distinct_users(store).await;
}

#[tokio::test]
async fn test_group_by_count_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_group_by_count(create_sqlite_store().await).await;
}

#[tokio::test]
async fn test_group_by_count_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(store) = create_postgres_store().await else {
        eprintln!("Skipping PostgreSQL test: DATABASE_URL not set");
        return;
    };
    check_group_by_count(store).await;
}

#[tokio::test]
async fn test_concurrent_inserts_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_concurrent_inserts(create_sqlite_store().await).await;
}

#[tokio::test]
async fn test_concurrent_inserts_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(store) = create_postgres_store().await else {
        eprintln!("Skipping PostgreSQL test: DATABASE_URL not set");
        return;
    };
    check_concurrent_inserts(store).await;
}
