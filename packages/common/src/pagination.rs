use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page must be positive, got {0}")]
    NonPositive(i64),
}

/// A validated 1-based page of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// `page` defaults to 1 when absent. A page size of 0 is treated as 1.
    pub fn new(page: Option<i64>, per_page: u64) -> Result<Self, PageError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(PageError::NonPositive(page));
        }
        Ok(Self {
            page: page as u64,
            per_page: per_page.max(1),
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Rows to skip, capped at `i64::MAX` so every store can bind it.
    /// Pages past the end simply yield nothing.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }
}
