//! This module defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: i64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: i64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// Select the items on the 1-based `page` when `items` is split into pages of
/// `per_page` items.
///
/// The page covers the indices `[(page - 1) * per_page, page * per_page)`.
/// Negative bounds count back from the end of `items` and bounds past the end
/// are clamped, so pages out of range produce an empty or partial page rather
/// than an error. Item order is preserved.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: i64) -> Vec<T> {
    let len = items.len() as i64;
    let resolve_bound = |index: i64| {
        if index < 0 {
            (len + index).max(0)
        } else {
            index.min(len)
        }
    };

    let start = resolve_bound(page.saturating_sub(1).saturating_mul(per_page));
    let end = resolve_bound(page.saturating_mul(per_page));

    if start >= end {
        return Vec::new();
    }

    items
        .into_iter()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect()
}

/// The number of pages needed to show `item_count` items, `per_page` at a time.
pub fn page_count(item_count: usize, per_page: i64) -> u64 {
    if per_page <= 0 {
        return 0;
    }

    (item_count as u64).div_ceil(per_page as u64)
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
