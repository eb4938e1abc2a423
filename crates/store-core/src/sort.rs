//! # Sort Resolution
//!
//! Turns the caller's free-text sort field and direction token into a typed
//! [`SortSpec`].
//!
//! ## Rules
//! ```text
//! sort_field   sorting_direction   result
//! ──────────   ─────────────────   ─────────────────────────────
//! None         anything            no ORDER BY (natural order)
//! "price"      None                price ASC
//! "price"      "desc" / "DESC"     price DESC
//! "price"      "asc" / "up" / ""   price ASC
//! "bogus"      anything            Err(FieldNotFound)
//! ```

use crate::field::SortableField;
use crate::validation::{present, ValidationResult};

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses a direction token.
    ///
    /// Only a case-insensitive `"desc"` means descending. Anything else,
    /// including `"ascending"`, the empty string and no token at all, is
    /// ascending.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A validated ordering on one field of entity `F::ENTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Resolves the sort inputs of a criteria object.
///
/// An empty or whitespace-only field name counts as absent.
pub fn resolve_sort<F: SortableField>(
    field: Option<&str>,
    direction: Option<&str>,
) -> ValidationResult<Option<SortSpec<F>>> {
    let Some(name) = present(field) else {
        return Ok(None);
    };

    let field: F = name.parse()?;
    Ok(Some(SortSpec {
        field,
        direction: SortDirection::from_token(direction),
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::field::{ProductField, SaleField};

    #[test]
    fn test_desc_is_case_insensitive() {
        for token in ["DESC", "desc", "Desc", "dEsC"] {
            assert_eq!(SortDirection::from_token(Some(token)), SortDirection::Desc);
        }
    }

    #[test]
    fn test_anything_else_is_ascending() {
        for token in ["asc", "ASC", "ascending", "descending", "", "garbage"] {
            assert_eq!(SortDirection::from_token(Some(token)), SortDirection::Asc);
        }
        assert_eq!(SortDirection::from_token(None), SortDirection::Asc);
    }

    #[test]
    fn test_no_field_means_no_sort() {
        let sort = resolve_sort::<ProductField>(None, Some("desc")).unwrap();
        assert!(sort.is_none());

        let sort = resolve_sort::<ProductField>(Some("  "), Some("desc")).unwrap();
        assert!(sort.is_none());
    }

    #[test]
    fn test_field_without_direction_is_ascending() {
        let sort = resolve_sort::<ProductField>(Some("price"), None)
            .unwrap()
            .unwrap();
        assert_eq!(sort.field, ProductField::Price);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_unknown_field_fails() {
        let err = resolve_sort::<SaleField>(Some("nonexistentColumn"), Some("asc")).unwrap_err();
        assert!(matches!(err, ValidationError::FieldNotFound { .. }));
    }
}
