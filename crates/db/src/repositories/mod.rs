//! Database repositories.

pub mod comment;
pub mod community;
pub mod like;
pub mod post;
pub mod subscription;
pub mod topic;
pub mod user;

pub use comment::{CommentRepository, PostCommentRow, UserCommentRow};
pub use community::CommunityRepository;
pub use like::{LikeRepository, UserLikeRow};
pub use post::{PostFilter, PostRepository, PostRow};
pub use subscription::{SubscriberRow, SubscriptionRepository, UserSubscriptionRow};
pub use topic::TopicRepository;
pub use user::UserRepository;

use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, TransactionTrait};

/// Open a read-only transaction so multi-query projections see one snapshot.
pub(crate) async fn snapshot(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    db.begin_with_config(
        Some(IsolationLevel::RepeatableRead),
        Some(AccessMode::ReadOnly),
    )
    .await
}
