//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Criteria search (exact-match filters, allow-listed sort, paging)
//! - CRUD operations
//!
//! ## Price Sorting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sortField=price  ──► ORDER BY p.price_cents ASC, p.id ASC             │
//! │                                                                         │
//! │  Laptop   1200.00  ─┐                                                  │
//! │  Mouse      25.50   ├──►  [Mouse 25.50, Keyboard 45.00] | [Laptop]     │
//! │  Keyboard   45.00  ─┘          page 0, size 2              page 1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use store_core::validation::{canonical_id, validate_new_product, validate_product_update};
use store_core::{NewProduct, Product, ProductCriteria, ProductUpdate, SearchCriteria};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::query::{execute, PRODUCT_COLUMNS};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Returns one page of products matching `criteria`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let cheapest_two = repo.search(&ProductCriteria {
    ///     sort_field: Some("price".into()),
    ///     page_size: 2,
    ///     ..Default::default()
    /// }).await?;
    /// ```
    pub async fn search(&self, criteria: &ProductCriteria) -> DbResult<Vec<Product>> {
        info!(?criteria, "Searching products");

        let spec = criteria.to_query_spec()?;
        let mut conn = self.pool.acquire().await?;
        let products: Vec<Product> = execute(&mut conn, &spec).await?;

        if products.is_empty() {
            warn!(page = spec.page.index(), "Product search returned no rows");
        }
        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        let id = canonical_id(id);
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ?");

        sqlx::query_as::<_, Product>(&sql)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                warn!(id = %id, "Product not found");
                DbError::not_found("Product", id.as_str())
            })
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - with generated id and creation date
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn insert(&self, new_product: &NewProduct) -> DbResult<Product> {
        validate_new_product(new_product)?;

        let product = Product {
            id: generate_product_id(),
            name: new_product.name.clone(),
            trade_mark: new_product.trade_mark.clone(),
            price_cents: new_product.price.cents(),
            description: new_product.description.clone(),
            stock: new_product.stock,
            creation_date: new_product
                .creation_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, trade_mark, price_cents, description, stock, creation_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.trade_mark)
        .bind(product.price_cents)
        .bind(&product.description)
        .bind(product.stock)
        .bind(product.creation_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("name", &product.name),
            other => other,
        })?;

        Ok(product)
    }

    /// Updates a product's catalog fields. Stock is left untouched.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        validate_product_update(update)?;

        let id = canonical_id(id);
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                trade_mark = ?3,
                price_cents = ?4,
                description = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&id)
        .bind(&update.name)
        .bind(&update.trade_mark)
        .bind(update.price.cents())
        .bind(&update.description)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("name", &update.name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(&id).await
    }

    /// Deletes a product.
    ///
    /// ## Errors
    /// * `NotFound` - no such product
    /// * `ForeignKeyViolation` - the product appears in a sale
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let id = canonical_id(id);
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pool::{Database, DbConfig};
    use store_core::Money;

    fn new_product(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            trade_mark: "Acme".to_string(),
            price: price.parse().unwrap(),
            description: format!("{name} description"),
            stock: 10,
            creation_date: None,
        }
    }

    async fn setup() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;
        let inserted = repo.insert(&new_product("Mouse", "25.50")).await.unwrap();

        let fetched = repo.get_by_id(&inserted.id).await.unwrap();
        assert_eq!(fetched.price(), Money::from_cents(2550));
        assert_eq!(fetched.creation_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let repo = setup().await;
        repo.insert(&new_product("Mouse", "25.50")).await.unwrap();

        let err = repo.insert(&new_product("Mouse", "30.00")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "Mouse"));
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let repo = setup().await;
        let product = repo.insert(&new_product("Mouse", "25.50")).await.unwrap();

        let updated = repo
            .update(
                &product.id,
                &ProductUpdate {
                    name: "Mouse Pro".to_string(),
                    trade_mark: "Logi".to_string(),
                    price: Money::from_cents(3000),
                    description: "Wireless".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Mouse Pro");
        assert_eq!(updated.price_cents, 3000);
        assert_eq!(updated.stock, 10);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = setup().await;
        let err = repo
            .update(
                &generate_product_id(),
                &ProductUpdate {
                    name: "Ghost".to_string(),
                    trade_mark: "None".to_string(),
                    price: Money::from_cents(100),
                    description: "Missing".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_search_by_price() {
        let repo = setup().await;
        repo.insert(&new_product("Laptop", "1200.00")).await.unwrap();
        repo.insert(&new_product("Mouse", "25.50")).await.unwrap();

        let page = repo
            .search(&ProductCriteria {
                price: Some(Money::from_cents(2550)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Mouse");
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_validation_error() {
        let repo = setup().await;
        let err = repo
            .search(&ProductCriteria {
                sort_field: Some("nonexistentColumn".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
