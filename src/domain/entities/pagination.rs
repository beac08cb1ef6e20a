use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw `page`/`limit` query values as they arrive over HTTP.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl PageParams {
    /// Rejects zero, negative or non-numeric values instead of guessing.
    pub fn new(page: i64, limit: i64) -> Result<Self, AppError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| AppError::invalid("page", "page must be a positive integer"))?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| *l >= 1)
            .ok_or_else(|| AppError::invalid("limit", "limit must be a positive integer"))?;

        (page as i64 - 1)
            .checked_mul(limit as i64)
            .ok_or_else(|| AppError::invalid("page", "page is out of range for this limit"))?;

        Ok(PageParams { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1).saturating_mul(self.limit as i64)
    }

    pub fn total_pages(&self, total: i64) -> u32 {
        if total <= 0 {
            return 0;
        }
        (total as u64).div_ceil(self.limit as u64) as u32
    }
}

impl TryFrom<&PageQuery> for PageParams {
    type Error = AppError;

    fn try_from(query: &PageQuery) -> Result<Self, Self::Error> {
        let page = parse_number("page", query.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_number("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;
        PageParams::new(page, limit)
    }
}

fn parse_number(field: &str, raw: Option<&str>, default: u32) -> Result<i64, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default as i64),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| AppError::invalid(field, format!("{field} must be an integer"))),
    }
}

/// One page of results plus the numbers needed to render a pager.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub articles: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn new(articles: Vec<T>, total: i64, params: PageParams) -> Self {
        Paginated {
            articles,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: params.total_pages(total),
        }
    }
}
