//! # Sale Repository
//!
//! Database operations for sales and their product links.
//!
//! ## Search and Hydration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Search (one connection)                         │
//! │                                                                         │
//! │  1. PAGE QUERY                                                         │
//! │     └── SELECT [DISTINCT] s.* ... joins ... LIMIT ? OFFSET ?           │
//! │                                                                         │
//! │  2. LOAD CUSTOMERS                                                     │
//! │     └── SELECT c.* FROM customers c WHERE c.id IN (page customers)     │
//! │                                                                         │
//! │  3. LOAD PRODUCTS                                                      │
//! │     └── SELECT sp.sale_id, p.* ... WHERE sp.sale_id IN (page sales)    │
//! │         ORDER BY p.price_cents, p.name                                 │
//! │                                                                         │
//! │  4. ASSEMBLE                                                           │
//! │     └── Sale { customer, products } in page order                     │
//! │                                                                         │
//! │  The connection returns to the pool when the search returns, on the   │
//! │  error path as well.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Writes
//! Insert, update and delete run in a single transaction each. The total is
//! always recomputed from the referenced products' current prices.

use chrono::{NaiveDate, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashMap};
use store_core::validation::{canonical_id, validate_new_sale};
use store_core::{Customer, Money, NewSale, Product, Sale, SaleCriteria, SearchCriteria};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::query::{execute, CUSTOMER_COLUMNS, PRODUCT_COLUMNS, SALE_COLUMNS};

/// A `sales` row before hydration.
#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    creation_date: NaiveDate,
    total_amount_cents: i64,
    customer_id: String,
}

/// The checked, canonical pieces of a sale write.
struct SaleParts {
    customer_id: String,
    product_ids: Vec<String>,
    total: Money,
}

/// A product together with the sale that references it.
#[derive(Debug, FromRow)]
struct SaleProductRow {
    sale_id: String,
    #[sqlx(flatten)]
    product: Product,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Returns one page of hydrated sales matching `criteria`.
    ///
    /// ## Relationship Filters
    /// - `customer_id` / `customer_name` share one customer join
    /// - `product_ids` matches sales containing any of the products; each
    ///   sale appears once however many of them it contains
    pub async fn search(&self, criteria: &SaleCriteria) -> DbResult<Vec<Sale>> {
        info!(?criteria, "Searching sales");

        let spec = criteria.to_query_spec()?;
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<SaleRow> = execute(&mut conn, &spec).await?;
        if rows.is_empty() {
            warn!(page = spec.page.index(), "Sale search returned no rows");
            return Ok(Vec::new());
        }

        let sales = hydrate(&mut conn, rows).await?;
        debug!(count = sales.len(), "Search returned sales");
        Ok(sales)
    }

    /// Gets a hydrated sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Sale> {
        let mut conn = self.pool.acquire().await?;
        fetch_hydrated(&mut conn, &canonical_id(id)).await
    }

    /// Records a sale for an existing customer and existing products.
    ///
    /// Duplicate product ids are collapsed. The total is the sum of the
    /// products' prices.
    ///
    /// ## Errors
    /// * `Validation` - missing customer id or empty product list
    /// * `NotFound` - unknown customer or product; nothing is written
    pub async fn insert(&self, new_sale: &NewSale) -> DbResult<Sale> {
        validate_new_sale(new_sale)?;

        let id = Uuid::new_v4().to_string();
        let creation_date = new_sale
            .creation_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let parts = resolve_parts(&mut tx, new_sale).await?;

        debug!(id = %id, customer_id = %parts.customer_id, total = %parts.total, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, creation_date, total_amount_cents, customer_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(creation_date)
        .bind(parts.total.cents())
        .bind(&parts.customer_id)
        .execute(&mut *tx)
        .await?;

        insert_links(&mut tx, &id, &parts.product_ids).await?;

        tx.commit().await?;

        self.get_by_id(&id).await
    }

    /// Replaces a sale's customer and products, recomputing its total.
    ///
    /// The creation date is kept unless the payload carries one.
    pub async fn update(&self, id: &str, new_sale: &NewSale) -> DbResult<Sale> {
        validate_new_sale(new_sale)?;

        let id = canonical_id(id);
        let mut tx = self.pool.begin().await?;

        let parts = resolve_parts(&mut tx, new_sale).await?;

        debug!(id = %id, total = %parts.total, "Updating sale");

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                customer_id = ?2,
                total_amount_cents = ?3,
                creation_date = COALESCE(?4, creation_date)
            WHERE id = ?1
            "#,
        )
        .bind(&id)
        .bind(&parts.customer_id)
        .bind(parts.total.cents())
        .bind(new_sale.creation_date)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        sqlx::query("DELETE FROM sale_products WHERE sale_id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        insert_links(&mut tx, &id, &parts.product_ids).await?;

        tx.commit().await?;

        self.get_by_id(&id).await
    }

    /// Deletes a sale and its product links, returning the deleted sale.
    pub async fn delete(&self, id: &str) -> DbResult<Sale> {
        let id = canonical_id(id);
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let sale = fetch_hydrated(&mut tx, &id).await?;

        // sale_products rows go with ON DELETE CASCADE
        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(sale)
    }

    /// Counts total sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Hydration
// =============================================================================

async fn fetch_hydrated(conn: &mut SqliteConnection, id: &str) -> DbResult<Sale> {
    let sql = format!("SELECT {SALE_COLUMNS} FROM sales s WHERE s.id = ?");

    let row = sqlx::query_as::<_, SaleRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            warn!(id = %id, "Sale not found");
            DbError::not_found("Sale", id)
        })?;

    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| DbError::not_found("Sale", id))
}

/// Attaches customers and products to a page of sale rows, keeping page order.
async fn hydrate(conn: &mut SqliteConnection, rows: Vec<SaleRow>) -> DbResult<Vec<Sale>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids: BTreeSet<&str> = rows.iter().map(|r| r.customer_id.as_str()).collect();

    let mut builder =
        QueryBuilder::new(format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.id IN ("));
    push_id_list(&mut builder, customer_ids);
    let customers: HashMap<String, Customer> = builder
        .build_query_as::<Customer>()
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();

    let mut builder = QueryBuilder::new(format!(
        "SELECT sp.sale_id, {PRODUCT_COLUMNS} FROM sale_products sp \
         INNER JOIN products p ON p.id = sp.product_id WHERE sp.sale_id IN ("
    ));
    push_id_list(&mut builder, rows.iter().map(|r| r.id.as_str()));
    builder.push(" ORDER BY p.price_cents ASC, p.name ASC");

    let mut products_by_sale: HashMap<String, Vec<Product>> = HashMap::new();
    for row in builder
        .build_query_as::<SaleProductRow>()
        .fetch_all(&mut *conn)
        .await?
    {
        products_by_sale.entry(row.sale_id).or_default().push(row.product);
    }

    rows.into_iter()
        .map(|row| {
            let customer = customers.get(&row.customer_id).cloned().ok_or_else(|| {
                DbError::Internal(format!(
                    "Sale {} references missing customer {}",
                    row.id, row.customer_id
                ))
            })?;
            let products = products_by_sale.remove(&row.id).unwrap_or_default();

            Ok(Sale {
                id: row.id,
                creation_date: row.creation_date,
                total_amount_cents: row.total_amount_cents,
                customer,
                products,
            })
        })
        .collect()
}

/// Pushes `?, ?, ...)` binding each id.
fn push_id_list<'a>(builder: &mut QueryBuilder<'_, Sqlite>, ids: impl IntoIterator<Item = &'a str>) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
}

// =============================================================================
// Write Helpers
// =============================================================================

/// Checks the customer and products exist. Returns the canonical customer
/// id, the distinct canonical product ids (first occurrence order) and the
/// sale total.
async fn resolve_parts(conn: &mut SqliteConnection, new_sale: &NewSale) -> DbResult<SaleParts> {
    let customer_id = canonical_id(&new_sale.customer_id);
    let customer: Option<String> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
        .bind(&customer_id)
        .fetch_optional(&mut *conn)
        .await?;
    if customer.is_none() {
        return Err(DbError::not_found("Customer", customer_id));
    }

    let mut seen = BTreeSet::new();
    let product_ids: Vec<String> = new_sale
        .product_ids
        .iter()
        .map(String::as_str)
        .map(canonical_id)
        .filter(|id| seen.insert(id.clone()))
        .collect();

    let mut builder =
        QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id IN ("));
    push_id_list(&mut builder, product_ids.iter().map(String::as_str));
    let products: Vec<Product> = builder
        .build_query_as::<Product>()
        .fetch_all(&mut *conn)
        .await?;

    if let Some(missing) = product_ids
        .iter()
        .find(|id| !products.iter().any(|p| &p.id == *id))
    {
        return Err(DbError::not_found("Product", missing));
    }

    let total: Money = products.iter().map(Product::price).sum();
    Ok(SaleParts {
        customer_id,
        product_ids,
        total,
    })
}

async fn insert_links(
    conn: &mut SqliteConnection,
    sale_id: &str,
    product_ids: &[String],
) -> DbResult<()> {
    for product_id in product_ids {
        sqlx::query("INSERT INTO sale_products (sale_id, product_id) VALUES (?1, ?2)")
            .bind(sale_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
