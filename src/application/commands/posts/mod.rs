// src/application/commands/posts/mod.rs
mod create;
mod delete;
mod links;
mod service;
mod update;

pub use create::{CreatePostCommand, CreatePostCommandBuilder};
pub use delete::DeletePostCommand;
pub use links::ReplacePostLinksCommand;
pub use service::PostCommandService;
pub use update::UpdatePostCommand;

use crate::domain::{
    category::CategoryId,
    errors::DomainResult,
    post::ReadingTime,
    tag::TagId,
};
use std::collections::BTreeSet;

pub(super) fn category_ids(ids: &[i64]) -> DomainResult<BTreeSet<CategoryId>> {
    ids.iter().map(|id| CategoryId::new(*id)).collect()
}

pub(super) fn tag_ids(ids: &[i64]) -> DomainResult<BTreeSet<TagId>> {
    ids.iter().map(|id| TagId::new(*id)).collect()
}

pub(super) fn reading_time(minutes: Option<i32>) -> DomainResult<Option<ReadingTime>> {
    minutes.map(ReadingTime::new).transpose()
}
