//! Slices a filtered view into fixed-size, 1-based pages.

use serde::Serialize;

/// Records shown per page.
pub const PAGE_SIZE: usize = 10;

/// One page of a filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSlice<T> {
    items: Vec<T>,
    /// The page actually returned, after clamping.
    page: usize,
    total_pages: usize,
    total_count: usize,
}

impl<T> PageSlice<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

/// `ceil(count / size)`, but never less than 1.
pub fn total_pages(count: usize, size: usize) -> usize {
    count.div_ceil(size.max(1)).max(1)
}

/// Pulls `page` into `1..=total_pages`.
pub fn clamp_page(page: usize, count: usize, size: usize) -> usize {
    page.clamp(1, total_pages(count, size))
}

/// Returns `items[(page-1)*size .. page*size]`, with `page` clamped to the available pages.
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> PageSlice<T> {
    let size = size.max(1);
    let total_count = items.len();
    let total_pages = total_pages(total_count, size);
    let page = clamp_page(page, total_count, size);
    let items = items
        .into_iter()
        .skip((page - 1) * size)
        .take(size)
        .collect();
    PageSlice {
        items,
        page,
        total_pages,
        total_count,
    }
}
