/// Pagination slicer.
///
/// Pure windowing over an already-filtered collection. The slicer never
/// clamps the page back into range itself — when the total shrinks, the
/// page-reset rules on [`TableState`](super::TableState) are what bring the
/// caller back to page 1.

/// One visible window plus the total count of the filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// The rows for the requested page, clamped to the collection bounds.
    pub visible: &'a [T],
    /// Size of the whole filtered collection, independent of page/page size.
    pub total: usize,
}

/// Slice out the 1-based `page` of `page_size` items.
///
/// The window is `[(page-1)*page_size, page*page_size)` clamped to the
/// sequence bounds. Out-of-range pages (and a zero page size) yield an empty
/// window, never an error.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let total = items.len();
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    Page {
        visible: &items[start..end],
        total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
