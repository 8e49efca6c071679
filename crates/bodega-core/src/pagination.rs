//! # Pagination Module
//!
//! Client-side pagination over an in-memory, already ordered list, plus the
//! page-number window used by the page controls under every admin table.
//!
//! ## State vs. Derived Values
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Paginator                                        │
//! │                                                                         │
//! │  STATE (owned)                 DERIVED (recomputed on every read)       │
//! │  ─────────────                 ─────────────────────────────────        │
//! │  current_page  (1-indexed)     total_items  = source.len()              │
//! │  page_size                     total_pages  = max(1, ⌈items / size⌉)    │
//! │  dependencies  (e.g. filter)   start_index  = (page - 1) × size         │
//! │                                paginated_data = source[start..+size]    │
//! │                                                                         │
//! │  TRANSITIONS                                                            │
//! │  set_page(n)           current_page = n        (no clamping)            │
//! │  set_page_size(n)      page_size = n, current_page = 1                  │
//! │  sync_dependencies(d)  if d changed: current_page = 1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `set_page` trusts the caller: the page controls disable navigation
//! outside `1..=total_pages`, and a page past the end simply reads as empty.
//!
//! ## Usage
//! ```rust
//! use bodega_core::pagination::{visible_pages, PageItem, Paginator};
//!
//! let products: Vec<&str> = vec!["arepa"; 23];
//! let mut pager = Paginator::with_dependencies(10, String::new());
//!
//! pager.set_page(3);
//! let page = pager.page(&products);
//! assert_eq!(page.total_pages, 3);
//! assert_eq!(page.paginated_data.len(), 3);
//!
//! // The search box changed: back to the first page
//! assert!(pager.sync_dependencies("queso".to_string()));
//! assert_eq!(pager.current_page(), 1);
//!
//! assert_eq!(visible_pages(1, 1), vec![PageItem::Page(1)]);
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, VISIBLE_PAGE_RADIUS};

// =============================================================================
// Paginator
// =============================================================================

/// Page state for one table or list view.
///
/// `D` is the caller's reset dependency: whatever value, when it changes,
/// should send the view back to page 1 (search text, a [`ProductFilter`],
/// a tuple of both). Use `()` when nothing triggers a reset.
///
/// [`ProductFilter`]: crate::types::ProductFilter
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<D = ()> {
    current_page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    dependencies: D,
}

impl Paginator<()> {
    /// Creates a paginator without reset dependencies.
    pub fn new(page_size: usize) -> Self {
        Paginator::with_dependencies(page_size, ())
    }
}

impl Default for Paginator<()> {
    fn default() -> Self {
        Paginator::new(DEFAULT_PAGE_SIZE)
    }
}

impl<D> Paginator<D> {
    /// Creates a paginator on page 1 holding the initial dependency value.
    pub fn with_dependencies(page_size: usize, dependencies: D) -> Self {
        Paginator {
            current_page: 1,
            page_size: page_size.max(1),
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            dependencies,
        }
    }

    /// Replaces the sizes offered by the page-size selector.
    ///
    /// The list only describes the selector; [`Paginator::set_page_size`]
    /// does not check against it. Callers that need the restriction use
    /// [`crate::validation::validate_page_size`].
    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// The current 1-indexed page.
    #[inline]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sizes offered by the page-size selector.
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// The dependency value last seen.
    pub fn dependencies(&self) -> &D {
        &self.dependencies
    }

    /// Moves to `page` without checking it against the page count.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Changes the density and returns to the first page.
    ///
    /// A size of `0` is stored as `1`, so the page count is always defined.
    /// Sizes outside [`Paginator::page_size_options`] are accepted as-is.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    /// Index of the first row of the current page in the source list.
    pub fn start_index(&self) -> usize {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    /// Number of pages for `total_items` rows; never less than 1.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Projects the current page out of `source`.
    ///
    /// The slice clamps at the end of the list and is empty when the
    /// current page lies past the last one.
    pub fn page<'a, T>(&self, source: &'a [T]) -> Page<'a, T> {
        let total_items = source.len();
        let start_index = self.start_index();
        let begin = start_index.min(total_items);
        let end = start_index.saturating_add(self.page_size).min(total_items);

        Page {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items,
            total_pages: self.total_pages(total_items),
            start_index,
            paginated_data: &source[begin..end],
        }
    }
}

impl<D: PartialEq> Paginator<D> {
    /// Records the caller's latest dependency value.
    ///
    /// When it differs from the previous one the view returns to page 1
    /// (page size untouched) and `true` is returned.
    pub fn sync_dependencies(&mut self, dependencies: D) -> bool {
        if self.dependencies == dependencies {
            return false;
        }

        self.dependencies = dependencies;
        self.current_page = 1;
        true
    }
}

// =============================================================================
// Page
// =============================================================================

/// A borrowed view of one page plus its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    /// The 1-indexed page this view shows.
    pub current_page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Length of the whole source list.
    pub total_items: usize,
    /// Page count, at least 1.
    pub total_pages: usize,
    /// Offset of the first row of this page.
    pub start_index: usize,
    /// The rows of this page, at most `page_size` of them.
    pub paginated_data: &'a [T],
}

impl<'a, T> Page<'a, T> {
    /// True when a "previous" control should be enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// True when a "next" control should be enabled.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page-number window for this page's controls.
    pub fn visible_pages(&self) -> Vec<PageItem> {
        visible_pages(self.current_page, self.total_pages)
    }

    /// Copies the page into an owned response body.
    pub fn to_response(&self) -> PageResponse<T>
    where
        T: Clone,
    {
        PageResponse {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            data: self.paginated_data.to_vec(),
        }
    }
}

/// Owned page, shaped for JSON responses to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

// =============================================================================
// Page Controls
// =============================================================================

/// One slot in the page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A clickable page number.
    Page(usize),
    /// A gap marker ("…").
    Ellipsis,
}

/// Serialises as `number | "ellipsis"`, the shape the front end renders.
impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(page) => serializer.serialize_u64(*page as u64),
            PageItem::Ellipsis => serializer.serialize_str("ellipsis"),
        }
    }
}

/// Builds the page-number list for the page controls.
///
/// ## Layout
/// ```text
/// current = 10, total = 20, radius = 2
///
///   1  …  8  9 [10] 11 12  …  20
///   │  │  └──── window ───┘  │  │
///   │  │                     │  └─ last page (omitted when total == 1)
///   │  └─ gap if 10-2 > 2    └─ gap if 10+2 < 20-1
///   └─ first page, always
/// ```
///
/// The window is clipped to `2..=total-1` so the first and last pages are
/// never repeated.
pub fn visible_pages(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    let radius = VISIBLE_PAGE_RADIUS as i64;
    let current = current_page as i64;
    let total = total_pages as i64;

    let mut items = vec![PageItem::Page(1)];

    if current - radius > 2 {
        items.push(PageItem::Ellipsis);
    }

    let window_start = (current - radius).max(2);
    let window_end = (current + radius).min(total - 1);
    for page in window_start..=window_end {
        items.push(PageItem::Page(page as usize));
    }

    if current + radius < total - 1 {
        items.push(PageItem::Ellipsis);
    }

    if total > 1 {
        items.push(PageItem::Page(total_pages));
    }

    items
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::{Ellipsis, Page as P};

    fn source(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_defaults() {
        let pager = Paginator::default();
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_size(), 10);
        assert_eq!(pager.page_size_options(), &[10, 25, 50, 100]);
    }

    #[test]
    fn test_page_count_and_last_page() {
        let items = source(23);
        let mut pager = Paginator::new(10);

        assert_eq!(pager.page(&items).total_pages, 3);

        pager.set_page(3);
        let page = pager.page(&items);
        assert_eq!(page.paginated_data.len(), 3);
        assert_eq!(page.paginated_data, &[20, 21, 22]);
        assert_eq!(page.start_index, 20);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_source_has_one_page() {
        let items: Vec<usize> = Vec::new();
        let page = Paginator::new(10).page(&items);

        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.paginated_data.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_exact_multiple() {
        let items = source(30);
        assert_eq!(Paginator::new(10).page(&items).total_pages, 3);
        assert_eq!(Paginator::new(10).page(&source(31)).total_pages, 4);
    }

    #[test]
    fn test_pages_reconstruct_source() {
        for size in [1, 3, 7, 10, 25] {
            let items = source(23);
            let mut pager = Paginator::new(size);
            let total_pages = pager.page(&items).total_pages;

            let mut rebuilt = Vec::new();
            for n in 1..=total_pages {
                pager.set_page(n);
                let page = pager.page(&items);
                assert!(page.paginated_data.len() <= size);
                rebuilt.extend_from_slice(page.paginated_data);
            }

            assert_eq!(rebuilt, items, "page size {size}");
        }
    }

    #[test]
    fn test_set_page_does_not_clamp() {
        let items = source(23);
        let mut pager = Paginator::new(10);

        pager.set_page(7);
        assert_eq!(pager.current_page(), 7);

        let page = pager.page(&items);
        assert!(page.paginated_data.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let items = source(100);
        let mut pager = Paginator::new(10);
        pager.set_page(8);

        pager.set_page_size(25);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_size(), 25);
        assert_eq!(pager.page(&items).total_pages, 4);
    }

    #[test]
    fn test_page_size_options_do_not_restrict() {
        let mut pager = Paginator::new(10).with_page_size_options([10, 20]);
        pager.set_page_size(7);
        assert_eq!(pager.page_size(), 7);
        assert_eq!(pager.page_size_options(), &[10, 20]);
        assert_eq!(pager.page(&source(15)).total_pages, 3);
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let mut pager = Paginator::new(0);
        assert_eq!(pager.page_size(), 1);

        pager.set_page_size(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.page(&source(5)).total_pages, 5);
    }

    #[test]
    fn test_dependency_change_resets_page_only() {
        let mut pager = Paginator::with_dependencies(25, ("".to_string(), None::<String>));
        pager.set_page(4);

        // Same value: nothing happens
        assert!(!pager.sync_dependencies(("".to_string(), None)));
        assert_eq!(pager.current_page(), 4);

        // Search text changed
        assert!(pager.sync_dependencies(("queso".to_string(), None)));
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_size(), 25);
        assert_eq!(pager.dependencies().0, "queso");
    }

    #[test]
    fn test_to_response() {
        let items = vec!["a", "b", "c"];
        let mut pager = Paginator::new(2);
        pager.set_page(2);

        let response = pager.page(&items).to_response();
        assert_eq!(response.data, vec!["c"]);
        assert_eq!(response.total_pages, 2);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalItems"], 3);
    }

    #[test]
    fn test_visible_pages_middle() {
        assert_eq!(
            visible_pages(10, 20),
            vec![P(1), Ellipsis, P(8), P(9), P(10), P(11), P(12), Ellipsis, P(20)]
        );
    }

    #[test]
    fn test_visible_pages_single_page() {
        assert_eq!(visible_pages(1, 1), vec![P(1)]);
    }

    #[test]
    fn test_visible_pages_edges() {
        assert_eq!(visible_pages(1, 2), vec![P(1), P(2)]);
        assert_eq!(visible_pages(1, 5), vec![P(1), P(2), P(3), Ellipsis, P(5)]);
        assert_eq!(visible_pages(3, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
        assert_eq!(visible_pages(5, 5), vec![P(1), Ellipsis, P(3), P(4), P(5)]);
        assert_eq!(
            visible_pages(4, 20),
            vec![P(1), P(2), P(3), P(4), P(5), P(6), Ellipsis, P(20)]
        );
    }

    #[test]
    fn test_visible_pages_never_repeats_first_or_last() {
        for total in 1..=30 {
            for current in 1..=total {
                let items = visible_pages(current, total);
                let pages: Vec<usize> = items
                    .iter()
                    .filter_map(|item| match item {
                        P(n) => Some(*n),
                        Ellipsis => None,
                    })
                    .collect();

                let mut deduped = pages.clone();
                deduped.dedup();
                assert_eq!(pages, deduped, "current {current}, total {total}");
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                assert!(pages.contains(&current));
                assert_eq!(pages.last(), Some(&total));
            }
        }
    }

    #[test]
    fn test_page_item_serialization() {
        let json = serde_json::to_string(&visible_pages(10, 20)).unwrap();
        assert_eq!(json, r#"[1,"ellipsis",8,9,10,11,12,"ellipsis",20]"#);
    }
}
