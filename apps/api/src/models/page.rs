use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// `?page&limit` query parameters. Out-of-range values are clamped rather
/// than rejected: page >= 1, 1 <= limit <= 50.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page {
            page: query.page.unwrap_or(1).max(1),
            limit: query
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        PageQuery::default().into()
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn info(&self, count: usize, total: i64) -> PageInfo {
        let limit = self.limit as i64;
        PageInfo {
            current: self.page,
            total_pages: (total + limit - 1) / limit,
            count,
            total_items: total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current: u32,
    pub total_pages: i64,
    pub count: usize,
    pub total_items: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamps() {
        assert_eq!(Page::default(), Page { page: 1, limit: 10 });
        let page: Page = PageQuery {
            page: Some(0),
            limit: Some(500),
        }
        .into();
        assert_eq!(page, Page { page: 1, limit: 50 });
        let page: Page = PageQuery {
            page: Some(3),
            limit: Some(0),
        }
        .into();
        assert_eq!(page, Page { page: 3, limit: 1 });
    }

    #[test]
    fn test_offset_and_info() {
        let page = Page { page: 3, limit: 10 };
        assert_eq!(page.offset(), 20);
        let info = page.info(1, 21);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.count, 1);
        assert_eq!(Page::default().info(0, 0).total_pages, 0);
    }
}
