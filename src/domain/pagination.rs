// src/domain/pagination.rs
use crate::domain::errors::{DomainError, DomainResult};

pub const MAX_PAGE_SIZE: u32 = 100;

/// One-based page window used by every listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::Validation("page must be at least 1".into()));
        }
        if limit == 0 {
            return Err(DomainError::Validation("limit must be at least 1".into()));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
