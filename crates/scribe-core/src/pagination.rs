//! Page arithmetic and soft-delete visibility filters.

use serde::Serialize;

use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 100;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest row offset a page may start at; PostgreSQL's OFFSET is a signed bigint.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-based page request with `page_size` bounded to `[1, MAX_PAGE_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::Validation("page must be >= 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DomainError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let offset_in_range = (page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| offset <= MAX_OFFSET);
        if !offset_in_range {
            return Err(DomainError::Validation(format!("page {page} is out of range")));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip before this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `ceil(total_items / page_size)`, zero when there are no items.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if total_items == 0 || page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// One page of an ordered collection plus navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total_pages(total_items, request.page_size()),
            total_items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Which rows a query sees with respect to soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletedFilter {
    /// Active rows only.
    #[default]
    Exclude,
    /// Active and deleted rows.
    Include,
    /// Deleted rows only.
    Only,
}

impl DeletedFilter {
    /// `only_deleted` wins over `include_deleted`.
    pub fn from_flags(include_deleted: bool, only_deleted: bool) -> Self {
        if only_deleted {
            DeletedFilter::Only
        } else if include_deleted {
            DeletedFilter::Include
        } else {
            DeletedFilter::Exclude
        }
    }

    /// Whether this filter exposes deleted rows.
    pub fn reveals_deleted(&self) -> bool {
        !matches!(self, DeletedFilter::Exclude)
    }

    pub fn admits(&self, is_deleted: bool) -> bool {
        match self {
            DeletedFilter::Exclude => !is_deleted,
            DeletedFilter::Include => true,
            DeletedFilter::Only => is_deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_zero_based_offset() {
        let req = PageRequest::new(3, 10).unwrap();
        assert_eq!(req.skip(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn huge_page_numbers_are_rejected() {
        assert!(matches!(
            PageRequest::new(u64::MAX, 100),
            Err(DomainError::Validation(_))
        ));
        assert!(PageRequest::new(u64::MAX, 1).is_err());

        let last = MAX_OFFSET / 100 + 1;
        assert_eq!(PageRequest::new(last, 100).unwrap().skip(), (last - 1) * 100);
        assert!(PageRequest::new(last + 1, 100).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 100), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn page_size_is_bounded() {
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn page_carries_request_metadata() {
        let req = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![1, 2, 3], 25, req).map(|n| n * 2);

        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn only_deleted_overrides_include() {
        assert_eq!(DeletedFilter::from_flags(false, false), DeletedFilter::Exclude);
        assert_eq!(DeletedFilter::from_flags(true, false), DeletedFilter::Include);
        assert_eq!(DeletedFilter::from_flags(false, true), DeletedFilter::Only);
        assert_eq!(DeletedFilter::from_flags(true, true), DeletedFilter::Only);
    }

    #[test]
    fn filter_admits_rows() {
        assert!(DeletedFilter::Exclude.admits(false));
        assert!(!DeletedFilter::Exclude.admits(true));
        assert!(DeletedFilter::Include.admits(true));
        assert!(!DeletedFilter::Only.admits(false));
    }
}
