//! # Criteria Value Objects
//!
//! One criteria object per entity family. Created per request, read-only
//! while the query runs, dropped afterwards.
//!
//! ## Shape
//! ```text
//! GET /products?name=Mouse&sortField=price&sortingDirection=desc&pageSize=5
//!      │
//!      ▼  serde (camelCase keys, missing keys → defaults)
//! ProductCriteria {
//!     name: Some("Mouse"),
//!     sort_field: Some("price"),
//!     sorting_direction: Some("desc"),
//!     page_actual: 0,          ← default
//!     page_size: 5,
//!     ..None
//! }
//!      │
//!      ▼  SearchCriteria::to_query_spec()
//! QuerySpec { filter, sort: Some(price DESC), page: (0, 5) }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::field::{CustomerField, ProductField, SaleField};
use crate::filter::{customer_filter, product_filter, sale_filter, Filter};
use crate::money::Money;
use crate::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::query::SearchCriteria;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerCriteria {
    pub id: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub dni: Option<String>,
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
    pub sort_field: Option<String>,
    pub sorting_direction: Option<String>,
    #[serde(default = "default_page")]
    pub page_actual: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for CustomerCriteria {
    fn default() -> Self {
        CustomerCriteria {
            id: None,
            name: None,
            last_name: None,
            dni: None,
            creation_date: None,
            sort_field: None,
            sorting_direction: None,
            page_actual: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchCriteria for CustomerCriteria {
    type Field = CustomerField;

    fn filter(&self) -> Filter {
        customer_filter(self)
    }

    fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    fn sorting_direction(&self) -> Option<&str> {
        self.sorting_direction.as_deref()
    }

    fn page_actual(&self) -> i64 {
        self.page_actual
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCriteria {
    pub id: Option<String>,
    pub name: Option<String>,
    pub trade_mark: Option<String>,
    /// Exact price, as a decimal (`"25.50"` or `25.5`).
    #[ts(as = "Option<String>")]
    pub price: Option<Money>,
    pub stock: Option<i64>,
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
    pub sort_field: Option<String>,
    pub sorting_direction: Option<String>,
    #[serde(default = "default_page")]
    pub page_actual: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for ProductCriteria {
    fn default() -> Self {
        ProductCriteria {
            id: None,
            name: None,
            trade_mark: None,
            price: None,
            stock: None,
            creation_date: None,
            sort_field: None,
            sorting_direction: None,
            page_actual: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchCriteria for ProductCriteria {
    type Field = ProductField;

    fn filter(&self) -> Filter {
        product_filter(self)
    }

    fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    fn sorting_direction(&self) -> Option<&str> {
        self.sorting_direction.as_deref()
    }

    fn page_actual(&self) -> i64 {
        self.page_actual
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleCriteria {
    pub id: Option<String>,
    #[ts(as = "Option<String>")]
    pub creation_date: Option<NaiveDate>,
    /// Exact match on the owning customer.
    pub customer_id: Option<String>,
    /// Case-insensitive substring of the customer's name.
    pub customer_name: Option<String>,
    /// Sales containing at least one of these products.
    pub product_ids: Option<Vec<String>>,
    pub sort_field: Option<String>,
    pub sorting_direction: Option<String>,
    #[serde(default = "default_page")]
    pub page_actual: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for SaleCriteria {
    fn default() -> Self {
        SaleCriteria {
            id: None,
            creation_date: None,
            customer_id: None,
            customer_name: None,
            product_ids: None,
            sort_field: None,
            sorting_direction: None,
            page_actual: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchCriteria for SaleCriteria {
    type Field = SaleField;

    fn filter(&self) -> Filter {
        sale_filter(self)
    }

    fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    fn sorting_direction(&self) -> Option<&str> {
        self.sorting_direction.as_deref()
    }

    fn page_actual(&self) -> i64 {
        self.page_actual
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let criteria = SaleCriteria::default();
        assert_eq!(criteria.page_actual, 0);
        assert_eq!(criteria.page_size, 10);
        assert!(criteria.product_ids.is_none());
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{
            "lastName": "Doe",
            "creationDate": "2024-05-01",
            "sortField": "name",
            "sortingDirection": "DESC"
        }"#;
        let criteria: CustomerCriteria = serde_json::from_str(json).unwrap();

        assert_eq!(criteria.last_name.as_deref(), Some("Doe"));
        assert_eq!(criteria.creation_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(criteria.sort_field.as_deref(), Some("name"));
        assert_eq!(criteria.page_actual, 0);
        assert_eq!(criteria.page_size, 10);
    }

    #[test]
    fn test_deserialize_sale_criteria() {
        let json = r#"{"customerName":"doe","productIds":["a","b"],"pageActual":2,"pageSize":4}"#;
        let criteria: SaleCriteria = serde_json::from_str(json).unwrap();

        assert_eq!(criteria.customer_name.as_deref(), Some("doe"));
        assert_eq!(criteria.product_ids.as_ref().map(Vec::len), Some(2));
        assert_eq!((criteria.page_actual, criteria.page_size), (2, 4));
    }

    #[test]
    fn test_deserialize_decimal_price() {
        for json in [r#"{"price":"25.50"}"#, r#"{"price":25.5}"#] {
            let criteria: ProductCriteria = serde_json::from_str(json).unwrap();
            assert_eq!(criteria.price, Some(Money::from_cents(2550)), "{json}");
        }

        let whole: ProductCriteria = serde_json::from_str(r#"{"price":25}"#).unwrap();
        assert_eq!(whole.price, Some(Money::from_cents(2500)));

        assert!(serde_json::from_str::<ProductCriteria>(r#"{"price":"25.505"}"#).is_err());
    }
}
