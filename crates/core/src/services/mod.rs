//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod following;
pub mod interaction;
pub mod lookbook;
pub mod notification;
pub mod outfit;
pub mod post;
pub mod user;

pub use comment::{CommentService, CommentThread};
pub use following::FollowingService;
pub use interaction::{InteractionService, TargetRef, ToggleOutcome};
pub use lookbook::{CreateLookbookInput, LookbookService};
pub use notification::NotificationService;
pub use outfit::{CreateOutfitInput, OutfitService};
pub use post::{CreatePostInput, FeedType, PostService};
pub use user::UserService;
