// Catalog introspection statements. Table names are upper-cased and embedded
// as string literals; `{table_literal}` is replaced with the escaped name.

pub(crate) const SHOW_DATABASES_QUERY: &str = "SHOW DATABASES";

pub(crate) const LIST_TABLES_QUERY: &str =
    "SELECT name FROM sysobjects WHERE type = 'U' AND name <> 'dtproperties' ORDER BY name";

pub(crate) const LIST_TRIGGERS_QUERY: &str = "SELECT name FROM sysobjects WHERE xtype = 'TR'";

pub(crate) const LIST_VIEWS_QUERY: &str = "SELECT name FROM sysobjects WHERE xtype = 'V'";

pub(crate) const TABLE_TRIGGERS_QUERY_TEMPLATE: &str =
    "SELECT name FROM sysobjects WHERE xtype = 'TR' AND object_name(parent_obj) = '{table_literal}'";

pub(crate) const TABLE_COLUMNS_QUERY_TEMPLATE: &str =
    "SELECT * FROM INFORMATION_SCHEMA.Columns where TABLE_NAME = '{table_literal}'";

pub(crate) const TABLE_INDEXES_QUERY_TEMPLATE: &str = r#"SELECT
    IND.NAME [KEY_NAME], IND.INDEX_ID, IC.INDEX_COLUMN_ID, COL.NAME [COLUMN_NAME],
    IND.*, IC.*, COL.*
FROM SYS.INDEXES IND
INNER JOIN SYS.INDEX_COLUMNS IC
    ON IND.OBJECT_ID = IC.OBJECT_ID AND IND.INDEX_ID = IC.INDEX_ID
INNER JOIN SYS.COLUMNS COL
    ON IC.OBJECT_ID = COL.OBJECT_ID AND IC.COLUMN_ID = COL.COLUMN_ID
INNER JOIN SYS.TABLES T
    ON IND.OBJECT_ID = T.OBJECT_ID
WHERE T.NAME = '{table_literal}'"#;

pub(crate) const TABLE_FOREIGN_KEYS_QUERY_TEMPLATE: &str = r#"SELECT
    C.TABLE_CATALOG [PKTABLE_QUALIFIER],
    C.TABLE_SCHEMA [PKTABLE_OWNER],
    C.TABLE_NAME [PKTABLE_NAME],
    KCU.COLUMN_NAME [PKCOLUMN_NAME],
    C2.TABLE_CATALOG [FKTABLE_QUALIFIER],
    C2.TABLE_SCHEMA [FKTABLE_OWNER],
    C2.TABLE_NAME [FKTABLE_NAME],
    KCU2.COLUMN_NAME [FKCOLUMN_NAME],
    RC.UPDATE_RULE,
    RC.DELETE_RULE,
    C.CONSTRAINT_NAME [FKCONSTRAINT_NAME],
    C2.CONSTRAINT_NAME [PKCONSTRAINT_NAME],
    CAST(7 AS SMALLINT) [DEFERRABILITY]
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS C
INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU
    ON C.CONSTRAINT_SCHEMA = KCU.CONSTRAINT_SCHEMA
    AND C.CONSTRAINT_NAME = KCU.CONSTRAINT_NAME
INNER JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS RC
    ON C.CONSTRAINT_SCHEMA = RC.CONSTRAINT_SCHEMA
    AND C.CONSTRAINT_NAME = RC.CONSTRAINT_NAME
INNER JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS C2
    ON RC.UNIQUE_CONSTRAINT_SCHEMA = C2.CONSTRAINT_SCHEMA
    AND RC.UNIQUE_CONSTRAINT_NAME = C2.CONSTRAINT_NAME
INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU2
    ON C2.CONSTRAINT_SCHEMA = KCU2.CONSTRAINT_SCHEMA
    AND C2.CONSTRAINT_NAME = KCU2.CONSTRAINT_NAME
    AND KCU.ORDINAL_POSITION = KCU2.ORDINAL_POSITION
WHERE C.CONSTRAINT_TYPE = 'FOREIGN KEY' AND C.TABLE_NAME = '{table_literal}'"#;

pub(crate) fn render_table_query(template: &str, table: &str) -> String {
    template.replace("{table_literal}", &table_literal(&table.to_uppercase()))
}

/// Trigger lookups keep the caller's casing; `object_name()` is compared
/// verbatim.
pub(crate) fn render_table_triggers_query(table: &str) -> String {
    TABLE_TRIGGERS_QUERY_TEMPLATE.replace("{table_literal}", &table_literal(table))
}

fn table_literal(table: &str) -> String {
    table.replace('\'', "''")
}
