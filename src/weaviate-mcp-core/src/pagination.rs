use serde::Serialize;

/// Whether another page exists after the window `[offset, offset + limit)`
pub fn has_more_items(offset: usize, limit: usize, total: usize) -> bool {
    offset.saturating_add(limit) < total
}

/// Offset of the next page, if there is one
pub fn next_offset(current_offset: usize, limit: usize, total: usize) -> Option<usize> {
    has_more_items(current_offset, limit, total).then(|| current_offset + limit)
}

/// One page of results.
///
/// `count` always equals `items.len()` and `next_cursor` is only kept when
/// `has_more` is set; both are enforced at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    items: Vec<T>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

impl<T> PaginatedResult<T> {
    pub fn new(
        items: Vec<T>,
        total: Option<usize>,
        has_more: bool,
        next_cursor: Option<String>,
    ) -> Self {
        Self {
            count: items.len(),
            items,
            total,
            has_more,
            next_cursor: next_cursor.filter(|_| has_more),
        }
    }

    /// Offset-based page where "has more" means the page came back full.
    /// The service does not always report totals, so this is a heuristic.
    pub fn from_offset_page(items: Vec<T>, offset: usize, limit: usize) -> Self {
        let has_more = limit > 0 && items.len() == limit;
        let next_cursor = has_more.then(|| offset.saturating_add(limit).to_string());
        Self::new(items, None, has_more, next_cursor)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }
}
