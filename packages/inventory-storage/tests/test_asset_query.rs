//! Asset query engine against real SQLite databases
//!
//! Covers:
//! 1. Join-row deduplication of addresses and ports
//! 2. Host-ascending order preservation
//! 3. Filter precedence (id over host) and literal host matching
//! 4. Pagination window vs. filter-wide count
//! 5. Row-shape failures and file-backed bootstrap

use inventory_storage::query::signature::hash_string;
use inventory_storage::{
    AssetQuery, AssetQueryService, ErrorKind, InMemoryAssetStore, SqliteAssetStore,
    StorageConfig,
};
use pretty_assertions::assert_eq;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const SCHEMA: &str = "
    CREATE TABLE assets (id INTEGER PRIMARY KEY, host TEXT, comment TEXT, owner TEXT);
    CREATE TABLE ips (asset_id INTEGER REFERENCES assets(id), address TEXT);
    CREATE TABLE ports (asset_id INTEGER REFERENCES assets(id), port INTEGER);
";

fn seed(conn: &Connection) {
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO assets VALUES (1, 'b.example', 'web', 'ops');
         INSERT INTO assets VALUES (2, 'a.example', 'db', 'dba');
         INSERT INTO assets VALUES (3, 'c.example', 'cache', 'ops');
         INSERT INTO ips VALUES (2, '10.0.0.1');
         INSERT INTO ips VALUES (2, '10.0.0.2');
         INSERT INTO ports VALUES (2, 5432);
         INSERT INTO ports VALUES (2, 22);
         INSERT INTO ports VALUES (2, 9187);
         INSERT INTO ips VALUES (1, '10.0.1.1');
         INSERT INTO ports VALUES (3, 6379);",
    )
    .unwrap();
}

fn service_with(conn: Connection) -> AssetQueryService<SqliteAssetStore> {
    let store = SqliteAssetStore::from_connection(conn, &StorageConfig::default()).unwrap();
    AssetQueryService::new(Arc::new(store))
}

fn seeded_service() -> AssetQueryService<SqliteAssetStore> {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn);
    service_with(conn)
}

fn hosts(assets: &[inventory_storage::Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.host.as_str()).collect()
}

#[tokio::test]
async fn test_no_filter_returns_all_assets_deduplicated() {
    let service = seeded_service();
    let page = service
        .query(&AssetQuery::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(page.total_count, 3);
    assert_eq!(hosts(&page.assets), vec!["a.example", "b.example", "c.example"]);

    // a.example: 2 ips × 3 ports = 6 join rows folded to 2 + 3 children
    let a = &page.assets[0];
    let addresses: Vec<&str> = a.ips.iter().map(|ip| ip.address.as_str()).collect();
    let mut ports: Vec<i64> = a.ports.iter().map(|p| p.port).collect();
    ports.sort_unstable();
    assert_eq!(addresses.len(), 2);
    assert!(addresses.contains(&"10.0.0.1") && addresses.contains(&"10.0.0.2"));
    assert_eq!(ports, vec![22, 5432, 9187]);

    // b.example has an ip but no ports; c.example a port but no ips
    assert_eq!(page.assets[1].ips.len(), 1);
    assert!(page.assets[1].ports.is_empty());
    assert!(page.assets[2].ips.is_empty());
    assert_eq!(page.assets[2].ports.len(), 1);
}

#[tokio::test]
async fn test_order_follows_host_not_insertion() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO assets VALUES (1, 'b.example', '', '');
         INSERT INTO assets VALUES (2, 'a.example', '', '');
         INSERT INTO ips VALUES (2, '192.168.0.1');
         INSERT INTO ips VALUES (2, '192.168.0.2');",
    )
    .unwrap();

    let page = service_with(conn)
        .query(&AssetQuery::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hosts(&page.assets), vec!["a.example", "b.example"]);
}

#[tokio::test]
async fn test_id_filter_takes_precedence_over_host() {
    let service = seeded_service();
    let query = AssetQuery {
        asset_id: "3".into(),
        host_filter: "a.example".into(),
        limit: 0,
        offset: 0,
    };

    let page = service.query(&query, &CancellationToken::new()).await.unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(hosts(&page.assets), vec!["c.example"]);
}

#[tokio::test]
async fn test_id_filter_is_exact() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    for id in [1, 10, 11, 21] {
        conn.execute(
            "INSERT INTO assets VALUES (?1, ?2, '', '')",
            params![id, format!("host-{}", id)],
        )
        .unwrap();
    }
    let service = service_with(conn);

    let page = service
        .query(&AssetQuery::by_id("1"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.assets[0].id, 1);

    let page = service
        .query(&AssetQuery::by_id("not-a-number"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
    assert!(page.assets.is_empty());
}

#[tokio::test]
async fn test_host_filter_is_case_sensitive_literal_substring() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO assets VALUES (1, 'db_01.example', '', '');
         INSERT INTO assets VALUES (2, 'dbx01.example', '', '');
         INSERT INTO assets VALUES (3, 'DB_01.EXAMPLE', '', '');",
    )
    .unwrap();
    let service = service_with(conn);

    let page = service
        .query(&AssetQuery::by_host("db_01"), &CancellationToken::new())
        .await
        .unwrap();

    // '_' is literal and case matters
    assert_eq!(page.total_count, 1);
    assert_eq!(hosts(&page.assets), vec!["db_01.example"]);
}

#[tokio::test]
async fn test_page_window_bounds_assets_not_rows() {
    let service = seeded_service();
    let query = AssetQuery::all().paginate(1, 0);

    let page = service.query(&query, &CancellationToken::new()).await.unwrap();

    // a.example contributes 6 join rows but is a single asset
    assert_eq!(page.assets.len(), 1);
    assert_eq!(page.assets[0].host, "a.example");
    assert_eq!(page.assets[0].ports.len(), 3);
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn test_second_page() {
    let service = seeded_service();
    let query = AssetQuery::all().paginate(2, 2);

    let page = service.query(&query, &CancellationToken::new()).await.unwrap();
    assert_eq!(hosts(&page.assets), vec!["c.example"]);

    let container = page.into_container(&query);
    assert_eq!(container.page_number, 2);
    assert_eq!(container.page_size, 2);
    assert_eq!(container.total_pages, 2);
    assert_eq!(container.total_count, 3);
}

#[tokio::test]
async fn test_pagination_arithmetic_over_23_assets() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    for id in 1..=23 {
        conn.execute(
            "INSERT INTO assets VALUES (?1, ?2, '', '')",
            params![id, format!("host-{:02}.example", id)],
        )
        .unwrap();
    }
    let service = service_with(conn);

    let query = AssetQuery::all().paginate(5, 20);
    let container = service
        .query(&query, &CancellationToken::new())
        .await
        .unwrap()
        .into_container(&query);
    assert_eq!(container.total_count, 23);
    assert_eq!(container.total_pages, 5);
    assert_eq!(container.page_number, 5);
    assert_eq!(container.assets.len(), 3);

    // no page size: everything in one page
    let query = AssetQuery::all();
    let container = service
        .query(&query, &CancellationToken::new())
        .await
        .unwrap()
        .into_container(&query);
    assert_eq!(container.total_pages, 1);
    assert_eq!(container.page_size, 23);
    assert_eq!(container.assets.len(), 23);
}

#[tokio::test]
async fn test_identical_triples_share_signature() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO assets VALUES (1, 'same.example', 'c', 'o');
         INSERT INTO assets VALUES (2, 'same.example', 'c', 'o');
         INSERT INTO assets VALUES (3, 'same.example', 'c', 'other');",
    )
    .unwrap();

    let page = service_with(conn)
        .query(&AssetQuery::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(page.assets[0].signature, page.assets[1].signature);
    assert_ne!(page.assets[0].signature, page.assets[2].signature);
    assert_eq!(page.assets[0].signature, hash_string("same.exampleco"));
}

#[tokio::test]
async fn test_malformed_row_is_row_scan_error() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "INSERT INTO assets VALUES (1, 'a.example', '', '');
         INSERT INTO ports VALUES (1, 'not-a-port');",
    )
    .unwrap();

    let err = service_with(conn)
        .query(&AssetQuery::all(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RowScan);
}

#[tokio::test]
async fn test_cancelled_query_propagates() {
    let service = seeded_service();
    let token = CancellationToken::new();
    token.cancel();

    let err = service.query(&AssetQuery::all(), &token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Cancelled);
}

#[tokio::test]
async fn test_file_backed_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("assets.db");
    {
        let conn = Connection::open(&db_path).unwrap();
        seed(&conn);
    }

    let store = SqliteAssetStore::open(&db_path, &StorageConfig::default()).unwrap();
    let service = AssetQueryService::new(Arc::new(store));

    let page = service
        .query(&AssetQuery::by_host("example"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn test_concurrent_queries_do_not_interfere() {
    let service = seeded_service();

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let query = if i % 2 == 0 {
                AssetQuery::by_id("2")
            } else {
                AssetQuery::all()
            };
            service.query(&query, &CancellationToken::new()).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let page = handle.await.unwrap().unwrap();
        let expected = if i % 2 == 0 { 1 } else { 3 };
        assert_eq!(page.total_count, expected);
        assert_eq!(page.assets.len(), expected as usize);
    }
}

#[tokio::test]
async fn test_memory_store_agrees_with_sqlite() {
    let memory = InMemoryAssetStore::new()
        .with_asset(1, "b.example", "web", "ops")
        .with_asset(2, "a.example", "db", "dba")
        .with_asset(3, "c.example", "cache", "ops")
        .with_ip(2, "10.0.0.1")
        .with_ip(2, "10.0.0.2")
        .with_port(2, 5432)
        .with_port(2, 22)
        .with_port(2, 9187)
        .with_ip(1, "10.0.1.1")
        .with_port(3, 6379);
    let memory = AssetQueryService::new(Arc::new(memory));
    let sqlite = seeded_service();

    for query in [
        AssetQuery::all(),
        AssetQuery::by_id("2"),
        AssetQuery::by_host("b."),
        AssetQuery::all().paginate(2, 1),
        AssetQuery::all().paginate(2, -1),
        AssetQuery::by_id("2.0"),
        AssetQuery::by_id("2e0"),
        AssetQuery::by_id("2.5"),
        AssetQuery::by_id("two"),
    ] {
        let token = CancellationToken::new();
        let from_memory = memory.query(&query, &token).await.unwrap();
        let from_sqlite = sqlite.query(&query, &token).await.unwrap();

        assert_eq!(from_memory.total_count, from_sqlite.total_count);
        assert_eq!(hosts(&from_memory.assets), hosts(&from_sqlite.assets));
        for (m, s) in from_memory.assets.iter().zip(&from_sqlite.assets) {
            assert_eq!(m.signature, s.signature);
            assert_eq!(m.ips.len(), s.ips.len());
            assert_eq!(m.ports.len(), s.ports.len());
        }
    }
}
