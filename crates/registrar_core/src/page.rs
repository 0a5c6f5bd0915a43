//! Pagination engine for ordered query results.
//!
//! # Responsibility
//! - Turn an ordered, filtered source plus a page request into a bounded
//!   page slice with paging metadata.
//!
//! # Invariants
//! - `0 <= items.len() <= page_size`; `page_index >= 1`.
//! - The index used for slicing is clamped to `1..=max(total_pages, 1)`:
//!   a request beyond the last page returns the last page, not an empty one.
//! - Empty source convention: empty items, `total_count = 0`,
//!   `total_pages = 0`, `page_index = 1`.
//! - The source must already be deterministically ordered; pagination never
//!   imposes ordering. Resetting to page 1 on a fresh search filter is
//!   caller policy, applied before invoking pagination.

use serde::Serialize;

/// 1-based page request. A `page_size` of zero is clamped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_index: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index: page_index.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// One bounded page of an ordered result, plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedList<T> {
    items: Vec<T>,
    total_count: u64,
    page_index: u32,
    page_size: u32,
}

impl<T> PaginatedList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Clamped 1-based index this page was actually sliced at.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `ceil(total_count / page_size)`; zero for an empty source.
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        let size = u64::from(self.page_size);
        let pages = (self.total_count + size - 1) / size;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages()
    }
}

/// Paginates an ordered source described by two callbacks.
///
/// `count` runs first over the filtered-but-unpaginated source; `fetch`
/// receives the computed `(offset, limit)` and returns only the requested
/// slice. Both run against the same source within the caller's scope, so
/// the count and the slice observe one consistent snapshot.
pub fn paginate<T, E>(
    request: PageRequest,
    count: impl FnOnce() -> Result<u64, E>,
    fetch: impl FnOnce(u64, u32) -> Result<Vec<T>, E>,
) -> Result<PaginatedList<T>, E> {
    let total_count = count()?;
    let page_size = request.page_size();

    let size = u64::from(page_size);
    let total_pages = (total_count + size - 1) / size;
    let last_page = total_pages.max(1);
    let page_index = u64::from(request.page_index()).min(last_page);

    let offset = (page_index - 1) * size;
    let items = fetch(offset, page_size)?;

    Ok(PaginatedList {
        items,
        total_count,
        page_index: u32::try_from(page_index).unwrap_or(u32::MAX),
        page_size,
    })
}
