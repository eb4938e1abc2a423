//! # Query Specification
//!
//! The storage-independent description of one search: what to match, how to
//! order it, and which window to return.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  criteria ──► Predicate Builder + Join Resolver ──► Filter             │
//! │          ──► Sort Resolver                       ──► Option<SortSpec>  │
//! │          ──► Paginator                           ──► Page              │
//! │                                                         │               │
//! │                                        QuerySpec ◄──────┘               │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                              store-db query executor (SQLite)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::field::SortableField;
use crate::filter::Filter;
use crate::pagination::Page;
use crate::sort::{resolve_sort, SortSpec};
use crate::types::EntityKind;
use crate::validation::ValidationResult;

/// A fully resolved search against entity `F::ENTITY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec<F> {
    pub filter: Filter,
    pub sort: Option<SortSpec<F>>,
    pub page: Page,
}

impl<F: SortableField> QuerySpec<F> {
    /// An unfiltered, unordered first page.
    pub fn new() -> Self {
        QuerySpec {
            filter: Filter::new(),
            sort: None,
            page: Page::default(),
        }
    }

    /// The entity this query reads.
    pub fn entity(&self) -> EntityKind {
        F::ENTITY
    }
}

impl<F: SortableField> Default for QuerySpec<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// A criteria object that can be resolved into a [`QuerySpec`].
pub trait SearchCriteria {
    /// Sortable fields of the searched entity.
    type Field: SortableField;

    /// Predicates (and joins) for every present filter field.
    fn filter(&self) -> Filter;

    fn sort_field(&self) -> Option<&str>;

    fn sorting_direction(&self) -> Option<&str>;

    fn page_actual(&self) -> i64;

    fn page_size(&self) -> i64;

    /// Resolves the criteria.
    ///
    /// ## Errors
    /// - `FieldNotFound` for a sort field outside the allow-list
    /// - `InvalidPagination` for a negative page or non-positive size
    fn to_query_spec(&self) -> ValidationResult<QuerySpec<Self::Field>> {
        let sort = resolve_sort(self.sort_field(), self.sorting_direction())?;
        let page = Page::new(self.page_actual(), self.page_size())?;

        Ok(QuerySpec {
            filter: self.filter(),
            sort,
            page,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{ProductCriteria, SaleCriteria};
    use crate::error::ValidationError;
    use crate::field::ProductField;
    use crate::sort::SortDirection;

    #[test]
    fn test_resolves_sort_and_page() {
        let criteria = ProductCriteria {
            sort_field: Some("price".to_string()),
            sorting_direction: Some("asc".to_string()),
            page_size: 2,
            ..Default::default()
        };
        let spec = criteria.to_query_spec().unwrap();

        assert_eq!(spec.entity(), EntityKind::Product);
        assert!(spec.filter.is_empty());
        assert_eq!(
            spec.sort,
            Some(SortSpec {
                field: ProductField::Price,
                direction: SortDirection::Asc,
            })
        );
        assert_eq!(spec.page, Page::new(0, 2).unwrap());
    }

    #[test]
    fn test_unknown_sort_field_fails() {
        let criteria = ProductCriteria {
            sort_field: Some("nonexistentColumn".to_string()),
            sorting_direction: Some("asc".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            criteria.to_query_spec(),
            Err(ValidationError::FieldNotFound { entity: EntityKind::Product, .. })
        ));
    }

    #[test]
    fn test_bad_pagination_fails() {
        let criteria = SaleCriteria {
            page_actual: -1,
            ..Default::default()
        };
        assert!(matches!(
            criteria.to_query_spec(),
            Err(ValidationError::InvalidPagination { page: -1, size: 10 })
        ));
    }
}
