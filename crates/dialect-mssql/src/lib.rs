//! SQL Server platform for dblib, targeting servers reached through the
//! FreeTDS/dblib driver.
//!
//! Those servers predate `OFFSET ... FETCH`, so row windows are emulated
//! with nested `TOP` selects (see [`rewrite_limit_query`]). Locking uses
//! table hints instead of `FOR UPDATE`, and temporal columns are declared
//! as fixed-width `CHAR`.

mod catalog_queries;
mod limit;
mod select;
mod types;

use dblib_core::{
    ColumnDef, DeclaredType, LockMode, MappedType, NowKind, Platform, PlatformConfig, Result,
    TransactionIsolation,
};

pub use limit::rewrite_limit_query;

const PLATFORM_NAME: &str = "mssql";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const PESSIMISTIC_WRITE_HINT: &str = " WITH (UPDLOCK, ROWLOCK)";
const PESSIMISTIC_READ_HINT: &str = " WITH (HOLDLOCK, ROWLOCK)";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MssqlPlatform {
    config: PlatformConfig,
}

impl MssqlPlatform {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

impl Platform for MssqlPlatform {
    fn name(&self) -> &str {
        PLATFORM_NAME
    }

    fn modify_limit_query(
        &self,
        query: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<String> {
        match limit {
            Some(limit) => rewrite_limit_query(query, limit, offset.unwrap_or(0)),
            None => Ok(query.to_string()),
        }
    }

    fn type_declaration(&self, declared: DeclaredType, column: &ColumnDef) -> String {
        types::type_declaration(&self.config, declared, column)
    }

    fn map_native_type(&self, native: &str) -> Option<MappedType> {
        types::map_native_type(native)
    }

    fn regexp_expression(&self) -> &str {
        "RLIKE"
    }

    fn now_expression(&self, _kind: NowKind) -> &str {
        "GETDATE()"
    }

    fn substring_expression(&self, value: &str, position: &str, length: Option<&str>) -> String {
        match length {
            Some(length) => format!("SUBSTRING({value}, {position}, {length})"),
            None => format!("SUBSTRING({value}, {position}, LEN({value}) - {position} + 1)"),
        }
    }

    fn concat_expression(&self, args: &[&str]) -> String {
        format!("({})", args.join(" + "))
    }

    fn guid_expression(&self) -> &str {
        "NEWID()"
    }

    fn show_databases_sql(&self) -> String {
        catalog_queries::SHOW_DATABASES_QUERY.to_string()
    }

    fn list_tables_sql(&self) -> String {
        catalog_queries::LIST_TABLES_QUERY.to_string()
    }

    fn list_views_sql(&self) -> String {
        catalog_queries::LIST_VIEWS_QUERY.to_string()
    }

    fn list_triggers_sql(&self) -> String {
        catalog_queries::LIST_TRIGGERS_QUERY.to_string()
    }

    fn list_table_columns_sql(&self, table: &str) -> String {
        catalog_queries::render_table_query(catalog_queries::TABLE_COLUMNS_QUERY_TEMPLATE, table)
    }

    fn list_table_indexes_sql(&self, table: &str) -> String {
        catalog_queries::render_table_query(catalog_queries::TABLE_INDEXES_QUERY_TEMPLATE, table)
    }

    fn list_table_foreign_keys_sql(&self, table: &str) -> String {
        catalog_queries::render_table_query(
            catalog_queries::TABLE_FOREIGN_KEYS_QUERY_TEMPLATE,
            table,
        )
    }

    fn list_table_triggers_sql(&self, table: &str) -> String {
        catalog_queries::render_table_triggers_query(table)
    }

    fn drop_database_sql(&self, name: &str) -> String {
        format!("DROP DATABASE {name}")
    }

    fn set_transaction_isolation_sql(&self, level: TransactionIsolation) -> String {
        format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql())
    }

    fn truncate_table_sql(&self, table: &str, _cascade: bool) -> String {
        format!("TRUNCATE TABLE {table}")
    }

    fn empty_identity_insert_sql(
        &self,
        quoted_table: &str,
        _quoted_identifier_column: &str,
    ) -> String {
        format!("INSERT INTO {quoted_table} DEFAULT VALUES")
    }

    fn for_update_sql(&self) -> &str {
        ""
    }

    fn append_lock_hint(&self, from_clause: &str, lock_mode: LockMode) -> String {
        match lock_mode {
            LockMode::PessimisticWrite => format!("{from_clause}{PESSIMISTIC_WRITE_HINT}"),
            LockMode::PessimisticRead => format!("{from_clause}{PESSIMISTIC_READ_HINT}"),
            LockMode::None | LockMode::Optimistic => from_clause.to_string(),
        }
    }

    fn prefers_identity_columns(&self) -> bool {
        true
    }

    fn supports_identity_columns(&self) -> bool {
        true
    }

    fn supports_savepoints(&self) -> bool {
        false
    }

    fn date_time_format_string(&self) -> &str {
        DATE_TIME_FORMAT
    }
}
