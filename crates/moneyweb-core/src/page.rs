//! Page requests and normalization of paginated responses

use moneyweb_config::{PaginationConfig, SortDirection};
use serde::{Deserialize, Serialize};

/// Most page buttons shown by the pager
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// A zero-based page request with sorting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32, sort_field: &str, sort_direction: SortDirection) -> Self {
        Self {
            page_number,
            page_size: page_size.max(1),
            sort_field: sort_field.to_string(),
            sort_direction,
        }
    }

    /// Request for `page_number` using the configured size and sort order
    pub fn from_config(config: &PaginationConfig, page_number: u32) -> Self {
        Self::new(page_number, config.page_size, &config.sort_by, config.sort_dir)
    }

    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Query parameters understood by every paginated backend endpoint
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pageNo", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortBy", self.sort_field.clone()),
            ("sortDir", self.sort_direction.to_string()),
        ]
    }
}

/// One normalized page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl<T> PageResult<T> {
    pub fn empty(page_number: u32) -> Self {
        Self {
            items: Vec::new(),
            page_number,
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_number + 1 < self.total_pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }
}

/// Paged envelope as sent by the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    #[serde(default)]
    pub number: Option<u32>,
}

/// Either wire shape of a list endpoint.
///
/// `List` must stay first: a derived struct also accepts a JSON array, so
/// the envelope variant would otherwise swallow bare lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageResponse<T> {
    List(Vec<T>),
    Envelope(PageEnvelope<T>),
}

impl<T> PageResponse<T> {
    /// Convert to a [`PageResult`].
    ///
    /// A bare list is one complete page. An envelope without `number` is
    /// assumed to answer `requested_page`.
    pub fn normalize(self, requested_page: u32) -> PageResult<T> {
        match self {
            PageResponse::List(items) => PageResult {
                total_elements: items.len() as u64,
                total_pages: 1,
                page_number: 0,
                items,
            },
            PageResponse::Envelope(envelope) => PageResult {
                items: envelope.content,
                page_number: envelope.number.unwrap_or(requested_page),
                total_pages: envelope.total_pages,
                total_elements: envelope.total_elements,
            },
        }
    }
}

/// Page indexes to show as buttons, centred on `current` and clamped to
/// `0..total_pages`
pub fn page_window(current: u32, total_pages: u32, max_buttons: u32) -> Vec<u32> {
    if total_pages == 0 || max_buttons == 0 {
        return Vec::new();
    }
    let current = current.min(total_pages - 1);
    let mut start = current.saturating_sub(max_buttons / 2);
    let end = (start + max_buttons - 1).min(total_pages - 1);
    if end - start + 1 < max_buttons {
        start = (end + 1).saturating_sub(max_buttons);
    }
    (start..=end).collect()
}
