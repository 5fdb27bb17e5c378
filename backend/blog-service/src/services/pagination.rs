/// Pagination over ordered listings.
///
/// Pure arithmetic: the repositories supply a total count and a page
/// slice, this module decides which slice that is. Page numbers are
/// 1-based; a request past the end is clamped to the last valid page, and
/// anything that does not parse as a positive integer means page 1.
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Interpret a raw `page` query value.
pub fn parse_page_param(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// LIMIT/OFFSET bounds for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub number: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: i64,
}

impl Paginator {
    pub fn new(per_page: i64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    /// Compute the effective page and its bounds for `total` items.
    /// An empty listing still has one (empty) page.
    pub fn bounds(&self, total: i64, requested: i64) -> PageBounds {
        let total = total.max(0);
        let total_pages = ((total + self.per_page - 1) / self.per_page).max(1);
        let number = requested.clamp(1, total_pages);

        PageBounds {
            number,
            total_pages,
            limit: self.per_page,
            offset: (number - 1) * self.per_page,
        }
    }

    /// Assemble the page object handed to render contexts.
    pub fn page<T>(&self, items: Vec<T>, total: i64, bounds: PageBounds) -> Page<T> {
        Page {
            items,
            number: bounds.number,
            total_pages: bounds.total_pages,
            total_items: total.max(0),
            has_next: bounds.number < bounds.total_pages,
            has_previous: bounds.number > 1,
        }
    }
}

/// One page of an ordered listing, with the metadata templates need for
/// pager links.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_split_ten_three() {
        let paginator = Paginator::new(10);

        let first = paginator.bounds(13, 1);
        assert_eq!(first.limit, 10);
        assert_eq!(first.offset, 0);
        assert_eq!(first.total_pages, 2);

        let second = paginator.bounds(13, 2);
        assert_eq!(second.limit, 10);
        assert_eq!(second.offset, 10);

        let page = paginator.page(vec![0u8; 3], 13, second);
        assert_eq!(page.items.len(), 3);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let paginator = Paginator::new(10);
        let bounds = paginator.bounds(13, 99);
        assert_eq!(bounds.number, 2);
        assert_eq!(bounds.offset, 10);
    }

    #[test]
    fn empty_listing_is_a_single_empty_page() {
        let paginator = Paginator::new(10);
        let bounds = paginator.bounds(0, 1);
        assert_eq!(bounds.number, 1);
        assert_eq!(bounds.total_pages, 1);

        let page = paginator.page(Vec::<u8>::new(), 0, bounds);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let paginator = Paginator::new(10);
        let bounds = paginator.bounds(20, 3);
        assert_eq!(bounds.total_pages, 2);
        assert_eq!(bounds.number, 2);
    }

    #[test]
    fn page_param_parsing() {
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("abc")), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
        assert_eq!(parse_page_param(Some("3")), 3);
        assert_eq!(parse_page_param(Some(" 2 ")), 2);
    }
}
