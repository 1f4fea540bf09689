//! Registry lifecycle tests against real SQLite pools.

use sqlkit::{
    Clause, ConnectionConfig, Dialect, Error, Registry, Row, Settings, Statement, WriteData, row,
};

fn memory_config() -> ConnectionConfig {
    let mut config = ConnectionConfig::new("sqlite", "sqlite::memory:");
    config.max_open_conns = 1;
    config.max_idle_conns = 1;
    config
}

#[tokio::test]
async fn test_default_and_named_resolution() {
    let registry = Registry::new();
    registry.register("default", &memory_config()).await.unwrap();
    registry.register("replica", &memory_config()).await.unwrap();

    let by_alias = registry.resolve(None).await.unwrap();
    let by_name = registry.resolve(Some("default")).await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&by_alias, &by_name));
    assert_eq!(by_alias.name(), "default");
    assert_eq!(by_alias.dialect(), Dialect::Sqlite);

    let replica = registry.resolve(Some("replica")).await.unwrap();
    assert!(!std::sync::Arc::ptr_eq(&by_alias, &replica));

    let err = registry.resolve(Some("missing")).await.unwrap_err();
    assert!(matches!(err, Error::UnknownHandle { name } if name == "missing"));

    let mut names = registry.names().await;
    names.sort();
    assert_eq!(names, vec!["default", "replica"]);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let registry = Registry::new();
    registry.register("default", &memory_config()).await.unwrap();
    let err = registry
        .register("default", &memory_config())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateHandle { name } if name == "default"));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn test_init_from_settings() {
    let settings = Settings::from_toml_str(
        r#"
        [db.default]
        driver = "sqlite"
        dsn = "sqlite::memory:"
        max_open_conns = 1
        max_idle_conns = 1

        [db.cache]
        driver = "sqlite"
        dsn = "sqlite::memory:"
        max_open_conns = 1
        max_idle_conns = 1
        "#,
    )
    .unwrap();

    let registry = Registry::new();
    registry.init_from_settings(&settings).await.unwrap();
    assert_eq!(registry.len().await, 2);
    assert!(registry.resolve(None).await.is_ok());
    assert!(registry.get("cache").await.is_ok());
}

#[tokio::test]
async fn test_init_from_settings_propagates_unknown_dialect() {
    let settings = Settings::from_toml_str(
        r#"
        [db.default]
        driver = "mongodb"
        dsn = "sqlite::memory:"
        "#,
    )
    .unwrap();

    let registry = Registry::new();
    let err = registry.init_from_settings(&settings).await.unwrap_err();
    assert!(matches!(err, Error::UnknownDialect(s) if s == "mongodb"));
}

#[tokio::test]
async fn test_statement_roundtrip_through_handle() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = format!("sqlite:{}", dir.path().join("test.db").display());

    let mut config = ConnectionConfig::new("sqlite", dsn);
    config.max_open_conns = 1;
    config.max_idle_conns = 1;

    let registry = Registry::new();
    let db = registry.register("default", &config).await.unwrap();

    let create = Statement {
        sql: "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, age INTEGER)"
            .to_string(),
        binds: Vec::new(),
    };
    db.execute(&create).await.unwrap();

    // Single insert.
    let alice = row! { "name" => "alice", "age" => 30 };
    let stmt = db.builder().table("users").to_insert(WriteData::row(&alice)).unwrap();
    assert_eq!(db.execute(&stmt).await.unwrap(), 1);

    // Batch insert.
    let batch = vec![
        row! { "name" => "bob", "age" => 25 },
        row! { "name" => "carol", "age" => 27 },
    ];
    let stmt = db
        .builder()
        .table("users")
        .to_batch_insert(WriteData::rows(&batch))
        .unwrap();
    assert_eq!(db.execute(&stmt).await.unwrap(), 2);

    // Update with a raw SET clause.
    let bump = row! { "age" => Clause::new("age + ?", [1]) };
    let stmt = db
        .builder()
        .table("users")
        .where_clause("name = ?", ["alice"])
        .to_update(WriteData::row(&bump))
        .unwrap();
    assert_eq!(db.execute(&stmt).await.unwrap(), 1);

    let sqlkit::DbPool::Sqlite(pool) = db.pool() else {
        panic!("expected a sqlite pool");
    };
    let age: i64 = sqlx::query_scalar("SELECT age FROM users WHERE name = 'alice'")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(age, 31);

    // Empty batch is a no-op.
    let empty: Vec<Row> = Vec::new();
    let stmt = db
        .builder()
        .table("users")
        .to_batch_insert(WriteData::rows(&empty))
        .unwrap();
    assert_eq!(db.execute(&stmt).await.unwrap(), 0);

    // Delete everything.
    let stmt = db.builder().table("users").to_delete();
    assert_eq!(db.execute(&stmt).await.unwrap(), 3);

    registry.close_all().await;
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_resolution_after_init() {
    let registry = std::sync::Arc::new(Registry::new());
    registry.register("default", &memory_config()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = std::sync::Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry.resolve(None).await.unwrap().name().to_string()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), "default");
    }
}
