pub mod analytics;
pub mod media;
pub mod newsletter;
pub mod posts;
pub mod taxonomy;
pub mod users;

use crate::domain::{errors::DomainResult, pagination::PageRequest};

pub(crate) fn page_request(
    page: Option<u32>,
    limit: Option<u32>,
    default_limit: u32,
) -> DomainResult<PageRequest> {
    PageRequest::new(page.unwrap_or(1), limit.unwrap_or(default_limit))
}
