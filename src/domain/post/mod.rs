pub mod entity;
pub mod links;
pub mod repository;
pub mod value_objects;

pub use entity::{
    NewPost, Post, PostDetails, PostFilter, PostOrder, PostUpdate, PublicationFilter,
    PublishState,
};
pub use links::{LinkKind, LinkTargets, PostLinkReplacer, PostLinkRepository};
pub use repository::{PostReadRepository, PostWriteRepository};
pub use value_objects::{PostContent, PostId, PostTitle, ReadingTime};
