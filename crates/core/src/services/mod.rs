//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod community;
pub mod gate;
pub mod like;
pub mod media;
pub mod post;
pub mod subscription;
pub mod topic;
pub mod user;

pub use comment::{
    CommentService, CommentView, CreateCommentInput, PostCommentView, UpdateCommentInput,
    UserCommentView,
};
pub use community::{
    CommunityService, CommunityView, CommunityWithPosts, CommunityWithSubscribers,
    CreateCommunityInput, DEFAULT_POPULAR_COUNT, SubscriberView,
};
pub use like::{LikeService, LikeView, LikedPostView};
pub use media::{Attachment, ImageFormat, MAX_ATTACHMENT_BYTES, MediaService, StorageService};
pub use post::{CreatePostInput, ListPostsQuery, PostService, PostView, Summary, UpdatePostInput};
pub use subscription::{
    SubscribeInput, SubscriptionService, SubscriptionView, UserSubscriptionView,
};
pub use topic::{CreateTopicInput, TopicService, TopicView, TopicWithPosts};
pub use user::{
    ChangePasswordInput, LoginInput, RegisterInput, UpdateUserInput, UserService, UserView,
};
