//! Row-window emulation for servers without `OFFSET ... FETCH`.
//!
//! The statement is over-fetched with `TOP (limit + offset)`, the last
//! `limit` rows of that batch are taken by re-selecting `TOP limit` in
//! reversed order, and an outer select restores the requested order:
//!
//! ```text
//! SELECT * FROM (
//!     SELECT TOP {limit} * FROM ({query with TOP limit+offset}) AS inner_tbl
//!     ORDER BY inner_tbl.key {reversed}
//! ) AS outer_tbl ORDER BY outer_tbl.key {original}
//! ```

use std::fmt::Write as _;

use dblib_core::{Error, Result};
use tracing::debug;

use crate::select::{SelectShape, SortKey};

pub(crate) const INNER_TABLE_ALIAS: &str = "inner_tbl";
pub(crate) const OUTER_TABLE_ALIAS: &str = "outer_tbl";

/// Rewrites `query` so that it skips `offset` rows and returns at most
/// `limit` rows. A non-positive `limit` returns the query unchanged.
pub fn rewrite_limit_query(query: &str, limit: i64, offset: i64) -> Result<String> {
    if limit <= 0 {
        return Ok(query.to_string());
    }
    if offset < 0 {
        return Err(Error::InvalidOffset { offset });
    }

    let limit = limit.unsigned_abs();
    let offset = offset.unsigned_abs();
    let over_fetch = limit + offset;

    let shape = SelectShape::scan(query);
    let sort_keys = shape.sort_keys();
    debug!(
        limit,
        offset,
        sort_keys = sort_keys.len(),
        "rewriting limit query with nested TOP"
    );

    let mut sql = String::with_capacity(query.len() + 96);
    write!(sql, "SELECT * FROM (SELECT TOP {limit} * FROM (")
        .expect("writing to String should not fail");
    push_over_fetch_query(&mut sql, query, &shape, over_fetch);
    write!(sql, ") AS {INNER_TABLE_ALIAS}").expect("writing to String should not fail");
    push_order_by(&mut sql, INNER_TABLE_ALIAS, &sort_keys, true);
    write!(sql, ") AS {OUTER_TABLE_ALIAS}").expect("writing to String should not fail");
    push_order_by(&mut sql, OUTER_TABLE_ALIAS, &sort_keys, false);

    Ok(sql)
}

fn push_over_fetch_query(sql: &mut String, query: &str, shape: &SelectShape<'_>, rows: u64) {
    let Some(head) = &shape.head else {
        sql.push_str(query);
        return;
    };

    sql.push_str(head.leading);
    sql.push_str("SELECT ");
    if head.distinct {
        sql.push_str("DISTINCT ");
    }
    write!(sql, "TOP {rows} ").expect("writing to String should not fail");
    sql.push_str(head.body);
}

fn push_order_by(sql: &mut String, table_alias: &str, keys: &[SortKey<'_>], reversed: bool) {
    if keys.is_empty() {
        return;
    }

    sql.push_str(" ORDER BY ");
    for (index, key) in keys.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        let direction = if reversed {
            key.direction.flipped()
        } else {
            key.direction
        };
        write!(sql, "{table_alias}.{} {}", key.reference, direction.as_sql())
            .expect("writing to String should not fail");
    }
}
