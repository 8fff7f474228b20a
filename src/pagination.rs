//! Length-aware page value handed to templates and the JSON API.

use serde::Serialize;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Where pagination links point: the current path plus the active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub path: String,
    /// Serialized filters without the page number.
    pub query: String,
}

impl PageLinks {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    pub fn url_for(&self, page: usize) -> String {
        if self.query.is_empty() {
            format!("{}?page={page}", self.path)
        } else {
            format!("{}?{}&page={page}", self.path, self.query)
        }
    }
}

/// One page of a filtered listing.
///
/// `total` always reflects every matching record, so a page past the end has
/// no items but still reports the real counts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub per_page: usize,
    pub page: usize,
    pub last_page: usize,
    /// Page numbers to render, `None` marks an elided range.
    pub pages: Vec<Option<usize>>,
    pub path: String,
    pub query: String,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, per_page: usize, page: usize, links: PageLinks) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let last_page = total.div_ceil(per_page).max(1);

        let pages = get_pages(last_page, page.min(last_page), 2, 2, 4, 2);

        let prev_url = (page > 1).then(|| links.url_for((page - 1).min(last_page)));
        let next_url = (page < last_page).then(|| links.url_for(page + 1));

        Self {
            items,
            total,
            per_page,
            page,
            last_page,
            pages,
            path: links.path,
            query: links.query,
            prev_url,
            next_url,
        }
    }
}
