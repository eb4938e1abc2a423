//! # Query Executor
//!
//! Renders a [`QuerySpec`] into a parameterized SQLite `SELECT` and runs it.
//!
//! ## Rendering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SELECT [DISTINCT] <root columns>                                      │
//! │  FROM <root table> <alias>                                             │
//! │  [INNER JOIN customers c ON c.id = s.customer_id]          ← Customer │
//! │  [INNER JOIN sale_products sp ON sp.sale_id = s.id                     │
//! │   INNER JOIN products p ON p.id = sp.product_id]           ← Products │
//! │  [WHERE p1 AND p2 AND ...]      root predicates, then join predicates  │
//! │  [ORDER BY <col> ASC|DESC, <alias>.id ASC]                             │
//! │  LIMIT ? OFFSET ?                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value is bound. Only column names from the sortable-field
//! allow-lists and fixed SQL fragments are pushed as text.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use store_core::field::{Column, SortableField};
use store_core::filter::{Predicate, Value};
use store_core::join::{Join, Relation};
use store_core::query::QuerySpec;
use store_core::types::EntityKind;
use tracing::debug;

use crate::error::DbResult;

// =============================================================================
// Projections
// =============================================================================

pub(crate) const CUSTOMER_COLUMNS: &str = "c.id, c.name, c.last_name, c.dni, c.creation_date";

pub(crate) const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.trade_mark, p.price_cents, p.description, p.stock, p.creation_date";

pub(crate) const SALE_COLUMNS: &str = "s.id, s.creation_date, s.total_amount_cents, s.customer_id";

fn root_columns(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Customer => CUSTOMER_COLUMNS,
        EntityKind::Product => PRODUCT_COLUMNS,
        EntityKind::Sale => SALE_COLUMNS,
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the page query for `spec`.
///
/// Joins are defined relative to the sales table and only appear in sale
/// queries.
pub fn build_query<F: SortableField>(spec: &QuerySpec<F>) -> QueryBuilder<'static, Sqlite> {
    let entity = spec.entity();
    let joins = spec.filter.joins();

    let mut builder = QueryBuilder::new("SELECT ");
    if joins.needs_distinct() {
        builder.push("DISTINCT ");
    }
    builder.push(root_columns(entity));
    builder.push(" FROM ");
    builder.push(entity.table());
    builder.push(" ");
    builder.push(entity.alias());

    for join in joins.iter() {
        push_join(&mut builder, join);
    }

    let predicates = spec
        .filter
        .predicates()
        .iter()
        .chain(joins.iter().flat_map(Join::predicates));

    let mut first = true;
    for predicate in predicates {
        builder.push(if first { " WHERE " } else { " AND " });
        first = false;
        predicate.push_sql(&mut builder);
    }

    if let Some(sort) = &spec.sort {
        builder.push(" ORDER BY ");
        builder.push(sort.field.column().to_string());
        builder.push(" ");
        builder.push(sort.direction.as_sql());
        if !sort.field.is_id() {
            builder.push(", ");
            builder.push(F::id().column().to_string());
            builder.push(" ASC");
        }
    }

    builder.push(" LIMIT ");
    builder.push_bind(spec.page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(spec.page.offset());

    builder
}

fn push_join(builder: &mut QueryBuilder<'_, Sqlite>, join: &Join) {
    let sale = EntityKind::Sale.alias();
    let target = join.relation().target();
    let alias = target.alias();

    match join.relation() {
        Relation::Customer => {
            builder.push(format!(
                " INNER JOIN {} {alias} ON {alias}.id = {sale}.customer_id",
                target.table()
            ));
        }
        Relation::Products => {
            builder.push(format!(
                " INNER JOIN sale_products sp ON sp.sale_id = {sale}.id \
                 INNER JOIN {} {alias} ON {alias}.id = sp.product_id",
                target.table()
            ));
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// Renders a predicate into a builder, binding its values.
trait PushSql {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Sqlite>);
}

impl PushSql for Predicate {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::Eq { column, value } => {
                push_column(builder, *column);
                builder.push(" = ");
                push_value(builder, value);
            }
            Predicate::ContainsIgnoreCase { column, needle } => {
                push_column(builder, *column);
                builder.push(" LIKE ");
                builder.push_bind(format!("%{}%", escape_like(needle)));
                builder.push(" ESCAPE '\\'");
            }
            Predicate::In { column, values } => {
                if values.is_empty() {
                    builder.push("0 = 1");
                } else {
                    push_column(builder, *column);
                    builder.push(" IN (");
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            builder.push(", ");
                        }
                        push_value(builder, value);
                    }
                    builder.push(")");
                }
            }
        }
    }
}

fn push_column(builder: &mut QueryBuilder<'_, Sqlite>, column: Column) {
    builder.push(column.to_string());
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Text(text) => builder.push_bind(text.clone()),
        Value::Integer(n) => builder.push_bind(*n),
        Value::Date(date) => builder.push_bind(*date),
    };
}

/// Escapes LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// =============================================================================
// Execution
// =============================================================================

/// Runs the page query for `spec` on `conn`, mapping rows into `R`.
///
/// Takes a connection rather than the pool so callers can run follow-up
/// queries (sale hydration) on the same connection.
pub async fn execute<R, F>(conn: &mut SqliteConnection, spec: &QuerySpec<F>) -> DbResult<Vec<R>>
where
    F: SortableField,
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut builder = build_query(spec);

    debug!(
        entity = %spec.entity(),
        joins = spec.filter.joins().len(),
        distinct = spec.filter.joins().needs_distinct(),
        sql = builder.sql(),
        limit = spec.page.limit(),
        offset = spec.page.offset(),
        "Executing search"
    );

    let rows = builder.build_query_as::<R>().fetch_all(&mut *conn).await?;
    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use store_core::{CustomerCriteria, ProductCriteria, SaleCriteria, SearchCriteria};

    const UUID_A: &str = "550e8400-e29b-41d4-a716-446655440000";
    const UUID_B: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    #[test]
    fn test_unfiltered_unsorted() {
        let spec = CustomerCriteria::default().to_query_spec().unwrap();
        let builder = build_query(&spec);

        assert_eq!(
            builder.sql(),
            "SELECT c.id, c.name, c.last_name, c.dni, c.creation_date FROM customers c \
             LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_filters_and_sort_with_tie_breaker() {
        let criteria = ProductCriteria {
            name: Some("Mouse".to_string()),
            stock: Some(3),
            sort_field: Some("price".to_string()),
            sorting_direction: Some("desc".to_string()),
            ..Default::default()
        };
        let builder = build_query(&criteria.to_query_spec().unwrap());
        let sql = builder.sql();

        assert!(sql.contains(" WHERE p.name = ? AND p.stock = ?"), "{sql}");
        assert!(sql.ends_with(" ORDER BY p.price_cents DESC, p.id ASC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn test_sort_by_id_has_no_tie_breaker() {
        let criteria = SaleCriteria {
            sort_field: Some("id".to_string()),
            ..Default::default()
        };
        let builder = build_query(&criteria.to_query_spec().unwrap());

        assert!(builder.sql().ends_with(" ORDER BY s.id ASC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn test_single_customer_join_for_two_customer_filters() {
        let criteria = SaleCriteria {
            customer_id: Some(UUID_A.to_string()),
            customer_name: Some("Doe".to_string()),
            ..Default::default()
        };
        let builder = build_query(&criteria.to_query_spec().unwrap());
        let sql = builder.sql();

        assert_eq!(sql.matches("INNER JOIN customers c").count(), 1);
        assert!(!sql.starts_with("SELECT DISTINCT"));
        assert!(sql.contains(" WHERE c.id = ? AND c.name_folded LIKE ? ESCAPE '\\'"), "{sql}");
    }

    #[test]
    fn test_product_join_is_distinct() {
        let criteria = SaleCriteria {
            product_ids: Some(vec![UUID_A.to_string(), UUID_B.to_string()]),
            ..Default::default()
        };
        let builder = build_query(&criteria.to_query_spec().unwrap());
        let sql = builder.sql();

        assert!(sql.starts_with("SELECT DISTINCT s.id"));
        assert!(sql.contains(
            "INNER JOIN sale_products sp ON sp.sale_id = s.id \
             INNER JOIN products p ON p.id = sp.product_id"
        ));
        assert!(sql.contains(" WHERE p.id IN (?, ?)"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("doe"), "doe");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
