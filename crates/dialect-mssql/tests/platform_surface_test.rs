use std::collections::BTreeMap;

use dblib_core::{
    ColumnDef, DeclaredType, LockMode, MappedType, NowKind, Platform, PlatformConfig,
    TransactionIsolation, VARCHAR_MAX_LENGTH_KEY,
};
use dblib_dialect_mssql::MssqlPlatform;

#[test]
fn platform_identity_and_capabilities() {
    let platform = MssqlPlatform::default();

    assert_eq!(platform.name(), "mssql");
    assert!(platform.prefers_identity_columns());
    assert!(platform.supports_identity_columns());
    assert!(!platform.supports_savepoints());
    assert_eq!(platform.date_time_format_string(), "%Y-%m-%d %H:%M:%S%.6f");
}

#[test]
fn platform_is_usable_as_a_shared_trait_object() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MssqlPlatform>();

    let platforms: Vec<Box<dyn Platform>> = vec![Box::new(MssqlPlatform::default())];
    assert_eq!(platforms[0].guid_expression(), "NEWID()");
}

#[test]
fn expression_helpers_render_tsql() {
    let platform = MssqlPlatform::default();

    assert_eq!(platform.regexp_expression(), "RLIKE");
    for kind in [NowKind::Timestamp, NowKind::Date, NowKind::Time] {
        assert_eq!(platform.now_expression(kind), "GETDATE()");
    }
    assert_eq!(
        platform.substring_expression("name", "2", Some("3")),
        "SUBSTRING(name, 2, 3)"
    );
    assert_eq!(
        platform.substring_expression("name", "2", None),
        "SUBSTRING(name, 2, LEN(name) - 2 + 1)"
    );
    assert_eq!(
        platform.concat_expression(&["first_name", "' '", "last_name"]),
        "(first_name + ' ' + last_name)"
    );
}

#[test]
fn lock_hints_follow_the_from_clause() {
    let platform = MssqlPlatform::default();

    assert_eq!(platform.for_update_sql(), "");
    assert_eq!(
        platform.append_lock_hint("users u", LockMode::PessimisticWrite),
        "users u WITH (UPDLOCK, ROWLOCK)"
    );
    assert_eq!(
        platform.append_lock_hint("users u", LockMode::PessimisticRead),
        "users u WITH (HOLDLOCK, ROWLOCK)"
    );
    assert_eq!(platform.append_lock_hint("users u", LockMode::Optimistic), "users u");
    assert_eq!(platform.append_lock_hint("users u", LockMode::None), "users u");
}

#[test]
fn statement_helpers_render_tsql() {
    let platform = MssqlPlatform::default();

    assert_eq!(platform.show_databases_sql(), "SHOW DATABASES");
    assert_eq!(platform.drop_database_sql("app"), "DROP DATABASE app");
    assert_eq!(platform.truncate_table_sql("users", true), "TRUNCATE TABLE users");
    assert_eq!(
        platform.empty_identity_insert_sql("[users]", "[id]"),
        "INSERT INTO [users] DEFAULT VALUES"
    );
    assert_eq!(
        platform.set_transaction_isolation_sql(TransactionIsolation::RepeatableRead),
        "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ"
    );
}

#[test]
fn catalog_queries_target_sysobjects_and_information_schema() {
    let platform = MssqlPlatform::default();

    assert_eq!(
        platform.list_tables_sql(),
        "SELECT name FROM sysobjects WHERE type = 'U' AND name <> 'dtproperties' ORDER BY name"
    );
    assert_eq!(
        platform.list_views_sql(),
        "SELECT name FROM sysobjects WHERE xtype = 'V'"
    );
    assert_eq!(
        platform.list_triggers_sql(),
        "SELECT name FROM sysobjects WHERE xtype = 'TR'"
    );
    assert_eq!(
        platform.list_table_triggers_sql("users"),
        "SELECT name FROM sysobjects WHERE xtype = 'TR' AND object_name(parent_obj) = 'users'"
    );

    let indexes = platform.list_table_indexes_sql("users");
    assert!(indexes.contains("FROM SYS.INDEXES IND"));
    assert!(indexes.ends_with("WHERE T.NAME = 'USERS'"));

    let foreign_keys = platform.list_table_foreign_keys_sql("orders");
    assert!(foreign_keys.contains("CAST(7 AS SMALLINT) [DEFERRABILITY]"));
    assert!(foreign_keys.ends_with("C.TABLE_NAME = 'ORDERS'"));
}

#[test]
fn declarations_use_platform_config() {
    let extra = BTreeMap::from([(VARCHAR_MAX_LENGTH_KEY.to_string(), "100".to_string())]);
    let config = PlatformConfig::from_extra(&extra).expect("config should load");
    let platform = MssqlPlatform::new(config);

    assert_eq!(platform.config().varchar_max_length, 100);
    assert_eq!(
        platform.type_declaration(DeclaredType::Varchar, &ColumnDef::with_length(100)),
        "VARCHAR(100)"
    );
    assert_eq!(
        platform.type_declaration(DeclaredType::Varchar, &ColumnDef::with_length(101)),
        "TEXT"
    );
    assert_eq!(
        platform.type_declaration(DeclaredType::Varchar, &ColumnDef::default().with_default()),
        "VARCHAR(100)"
    );
}

#[test]
fn native_type_mapping_covers_the_catalog_types() {
    let platform = MssqlPlatform::default();

    let expectations = [
        ("bigint", MappedType::BigInt),
        ("numeric", MappedType::Decimal),
        ("bit", MappedType::Boolean),
        ("tinyint", MappedType::SmallInt),
        ("smallmoney", MappedType::Integer),
        ("real", MappedType::Float),
        ("datetimeoffset", MappedType::DateTimeTz),
        ("datetime2", MappedType::DateTime),
        ("time", MappedType::Time),
        ("nchar", MappedType::String),
        ("image", MappedType::Text),
        ("UNIQUEIDENTIFIER", MappedType::Guid),
    ];
    for (native, expected) in expectations {
        assert_eq!(platform.map_native_type(native), Some(expected), "{native}");
    }
    assert_eq!(platform.map_native_type("xml"), None);
}
