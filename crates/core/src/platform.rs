use crate::{ColumnDef, DeclaredType, LockMode, MappedType, Result, TransactionIsolation};

/// Which current-moment value a `now` expression should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NowKind {
    #[default]
    Timestamp,
    Date,
    Time,
}

/// Contract the framework calls to turn abstract operations into one
/// engine's SQL text. Implementations are stateless; every method returns
/// SQL and performs no I/O.
pub trait Platform: Send + Sync {
    fn name(&self) -> &str;

    /// Applies a row window to `query`. `None` or a non-positive `limit`
    /// leaves the query untouched; an absent `offset` means zero.
    fn modify_limit_query(
        &self,
        query: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<String>;

    fn type_declaration(&self, declared: DeclaredType, column: &ColumnDef) -> String;
    fn map_native_type(&self, native: &str) -> Option<MappedType>;

    fn regexp_expression(&self) -> &str;
    fn now_expression(&self, kind: NowKind) -> &str;
    fn substring_expression(&self, value: &str, position: &str, length: Option<&str>) -> String;
    fn concat_expression(&self, args: &[&str]) -> String;
    fn guid_expression(&self) -> &str;

    fn show_databases_sql(&self) -> String;
    fn list_tables_sql(&self) -> String;
    fn list_views_sql(&self) -> String;
    fn list_triggers_sql(&self) -> String;
    fn list_table_columns_sql(&self, table: &str) -> String;
    fn list_table_indexes_sql(&self, table: &str) -> String;
    fn list_table_foreign_keys_sql(&self, table: &str) -> String;
    fn list_table_triggers_sql(&self, table: &str) -> String;

    fn drop_database_sql(&self, name: &str) -> String;
    fn set_transaction_isolation_sql(&self, level: TransactionIsolation) -> String;
    fn truncate_table_sql(&self, table: &str, cascade: bool) -> String;
    fn empty_identity_insert_sql(
        &self,
        quoted_table: &str,
        quoted_identifier_column: &str,
    ) -> String;

    fn for_update_sql(&self) -> &str;
    fn append_lock_hint(&self, from_clause: &str, lock_mode: LockMode) -> String;

    fn prefers_identity_columns(&self) -> bool;
    fn supports_identity_columns(&self) -> bool;
    fn supports_savepoints(&self) -> bool;
    fn date_time_format_string(&self) -> &str;
}
