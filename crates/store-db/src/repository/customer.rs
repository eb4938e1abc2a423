//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Key Operations
//! - Criteria search (exact-match filters, allow-listed sort, paging)
//! - CRUD operations

use chrono::Utc;
use sqlx::SqlitePool;
use store_core::filter::fold_case;
use store_core::validation::{canonical_id, validate_customer_update, validate_new_customer};
use store_core::{Customer, CustomerCriteria, CustomerUpdate, NewCustomer, SearchCriteria};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::query::{execute, CUSTOMER_COLUMNS};

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let page = repo.search(&CustomerCriteria {
///     last_name: Some("Doe".into()),
///     sort_field: Some("name".into()),
///     ..Default::default()
/// }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Returns one page of customers matching `criteria`.
    ///
    /// ## Errors
    /// * `Validation` - unknown sort field or bad paging, before any query runs
    /// * `StorageUnavailable` - the pool can't hand out a connection
    pub async fn search(&self, criteria: &CustomerCriteria) -> DbResult<Vec<Customer>> {
        info!(?criteria, "Searching customers");

        let spec = criteria.to_query_spec()?;
        let mut conn = self.pool.acquire().await?;
        let customers: Vec<Customer> = execute(&mut conn, &spec).await?;

        if customers.is_empty() {
            warn!(page = spec.page.index(), "Customer search returned no rows");
        }
        debug!(count = customers.len(), "Search returned customers");
        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        let id = canonical_id(id);
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.id = ?");

        sqlx::query_as::<_, Customer>(&sql)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                warn!(id = %id, "Customer not found");
                DbError::not_found("Customer", id.as_str())
            })
    }

    /// Registers a customer.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - with generated id and creation date
    /// * `Err(DbError::UniqueViolation)` - DNI already registered
    pub async fn insert(&self, new_customer: &NewCustomer) -> DbResult<Customer> {
        validate_new_customer(new_customer)?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: new_customer.name.clone(),
            last_name: new_customer.last_name.clone(),
            dni: new_customer.dni.clone(),
            creation_date: new_customer
                .creation_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        };

        debug!(id = %customer.id, dni = %customer.dni, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, name_folded, last_name, dni, creation_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(fold_case(&customer.name))
        .bind(&customer.last_name)
        .bind(&customer.dni)
        .bind(customer.creation_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("dni", &customer.dni),
            other => other,
        })?;

        Ok(customer)
    }

    /// Updates a customer's name and last name.
    pub async fn update(&self, id: &str, update: &CustomerUpdate) -> DbResult<Customer> {
        validate_customer_update(update)?;

        let id = canonical_id(id);
        debug!(id = %id, "Updating customer");

        let result = sqlx::query(
            "UPDATE customers SET name = ?2, name_folded = ?3, last_name = ?4 WHERE id = ?1",
        )
        .bind(&id)
        .bind(&update.name)
        .bind(fold_case(&update.name))
        .bind(&update.last_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.get_by_id(&id).await
    }

    /// Deletes a customer.
    ///
    /// ## Errors
    /// * `NotFound` - no such customer
    /// * `ForeignKeyViolation` - the customer still owns sales
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let id = canonical_id(id);
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts total customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    fn new_customer(name: &str, last_name: &str, dni: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            last_name: last_name.to_string(),
            dni: dni.to_string(),
            creation_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    async fn setup() -> CustomerRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().customers()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;
        let inserted = repo.insert(&new_customer("Ana", "Lopez", "111")).await.unwrap();

        let fetched = repo.get_by_id(&inserted.id).await.unwrap();
        assert_eq!(fetched, inserted);
        assert_eq!(fetched.creation_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_dni() {
        let repo = setup().await;
        repo.insert(&new_customer("Ana", "Lopez", "111")).await.unwrap();

        let err = repo
            .insert(&new_customer("Eva", "Ruiz", "111"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "dni"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let customer = repo.insert(&new_customer("Ana", "Lopez", "111")).await.unwrap();

        let updated = repo
            .update(
                &customer.id,
                &CustomerUpdate {
                    name: "Ana Maria".to_string(),
                    last_name: "Lopez".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.dni, "111");

        repo.delete(&customer.id).await.unwrap();
        assert!(matches!(
            repo.get_by_id(&customer.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(&customer.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_folded_name_follows_updates() {
        let repo = setup().await;
        let customer = repo.insert(&new_customer("ÁLVARO", "Núñez", "111")).await.unwrap();

        let folded: String = sqlx::query_scalar("SELECT name_folded FROM customers WHERE id = ?1")
            .bind(&customer.id)
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(folded, "álvaro");

        repo.update(
            &customer.id,
            &CustomerUpdate {
                name: "Íñigo".to_string(),
                last_name: "Núñez".to_string(),
            },
        )
        .await
        .unwrap();

        let folded: String = sqlx::query_scalar("SELECT name_folded FROM customers WHERE id = ?1")
            .bind(&customer.id)
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(folded, "íñigo");
    }

    #[tokio::test]
    async fn test_lookup_accepts_any_uuid_notation() {
        let repo = setup().await;
        let customer = repo.insert(&new_customer("Ana", "Lopez", "111")).await.unwrap();

        let upper = customer.id.to_uppercase();
        assert_eq!(repo.get_by_id(&upper).await.unwrap(), customer);

        let braced = format!("{{{}}}", customer.id);
        repo.delete(&braced).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_database() {
        let repo = setup().await;
        let err = repo.insert(&new_customer("", "Lopez", "111")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_by_last_name_sorted_desc() {
        let repo = setup().await;
        repo.insert(&new_customer("Ana", "Doe", "1")).await.unwrap();
        repo.insert(&new_customer("Zoe", "Doe", "2")).await.unwrap();
        repo.insert(&new_customer("Max", "Roe", "3")).await.unwrap();

        let page = repo
            .search(&CustomerCriteria {
                last_name: Some("Doe".to_string()),
                sort_field: Some("name".to_string()),
                sorting_direction: Some("DESC".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let names: Vec<_> = page.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zoe", "Ana"]);
    }
}
