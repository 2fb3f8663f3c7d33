/// Table state and derivation for the two dashboard tables.
///
/// Each table (namespaces, workloads) carries its own [`TableState`]:
/// free-text query, label query (meaningful for workloads only), current
/// page, and page size. The filter and pagination functions themselves are
/// pure and live in [`filter`] and [`paging`]; the state object only enforces
/// the page-reset rules.
pub mod filter;
pub mod paging;

pub use filter::{filter_namespaces, filter_workloads};
pub use paging::{Page, paginate};

/// Default rows per page, matching the service dashboard's table default.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter and pagination state for one table.
///
/// Mutation goes through the setters so the reset rules hold: changing the
/// text query, the label query, or the page size snaps the page back to 1.
/// Changing the page alone does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    query: String,
    label_query: String,
    page: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            query: String::new(),
            label_query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn label_query(&self) -> &str {
        &self.label_query
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set the free-text query and reset to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Set the label query and reset to page 1.
    pub fn set_label_query(&mut self, label_query: impl Into<String>) {
        self.label_query = label_query.into();
        self.page = 1;
    }

    /// Jump to a page. Pages are 1-based; zero is clamped up to 1. Pages past
    /// the end are allowed here — [`paginate`] yields an empty window for
    /// them.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size and reset to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
