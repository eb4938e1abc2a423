//! # Pagination
//!
//! Converts a zero-based page index and a page size into a LIMIT/OFFSET
//! window.
//!
//! ```text
//! 10 rows, size 4:
//!   page 0 → rows 1-4    (offset 0)
//!   page 1 → rows 5-8    (offset 4)
//!   page 2 → rows 9-10   (offset 8, short page)
//!   page 3 → []          (offset 12, empty, not an error)
//! ```
//!
//! No total count is computed. Callers that need "has next page" fetch
//! [`Page::next`] and check for emptiness.

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Page index used when the caller does not send one.
pub const DEFAULT_PAGE: i64 = 0;

/// Page size used when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A validated result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: i64,
    size: i64,
    offset: i64,
}

impl Page {
    /// Creates a page window.
    ///
    /// ## Errors
    /// `InvalidPagination` when the index is negative, the size is not
    /// positive, or `index * size` does not fit in an i64.
    pub fn new(index: i64, size: i64) -> ValidationResult<Self> {
        let invalid = || ValidationError::InvalidPagination { page: index, size };

        if index < 0 || size <= 0 {
            return Err(invalid());
        }

        let offset = index.checked_mul(size).ok_or_else(invalid)?;
        Ok(Page {
            index,
            size,
            offset,
        })
    }

    /// Zero-based page index.
    pub const fn index(&self) -> i64 {
        self.index
    }

    /// Maximum number of rows in this page.
    pub const fn limit(&self) -> i64 {
        self.size
    }

    /// Number of rows skipped before this page.
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// The page after this one, or `None` if its offset would overflow.
    pub fn next(&self) -> Option<Page> {
        Page::new(self.index.checked_add(1)?, self.size).ok()
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            index: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
