//! Database entities.

#![allow(missing_docs)]

pub mod comment;
pub mod community;
pub mod like;
pub mod post;
pub mod role;
pub mod subscription;
pub mod topic;
pub mod user;

pub use comment::Entity as Comment;
pub use community::Entity as Community;
pub use like::Entity as Like;
pub use post::Entity as Post;
pub use role::Entity as Role;
pub use subscription::Entity as Subscription;
pub use topic::Entity as Topic;
pub use user::Entity as User;
