//! Pagination envelope handling

use serde::Deserialize;

/// The backend's list envelope: `{"results": [...], "count": N}`
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: i64,
}

/// Pagination metadata kept alongside an unwrapped flat list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn from_page<T>(page: &Page<T>, requested_page: u32, page_size: u32) -> Self {
        Self {
            count: page.count,
            page: requested_page,
            page_size,
        }
    }

    /// Total number of pages implied by the count, at least 1
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        let pages = (self.count as u64).div_ceil(u64::from(self.page_size));
        pages.max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserializes() {
        let page: Page<i64> = serde_json::from_str(r#"{"results": [1, 2, 3], "count": 42}"#).unwrap();
        assert_eq!(page.results, vec![1, 2, 3]);
        assert_eq!(page.count, 42);
    }

    #[test]
    fn test_total_pages() {
        let meta = Pagination { count: 41, page: 1, page_size: 20 };
        assert_eq!(meta.total_pages(), 3);

        let exact = Pagination { count: 40, page: 1, page_size: 20 };
        assert_eq!(exact.total_pages(), 2);

        let empty = Pagination { count: 0, page: 1, page_size: 20 };
        assert_eq!(empty.total_pages(), 1);
    }
}
