//! Database repositories.

#![allow(missing_docs)]

pub mod comment;
pub mod interaction;
pub mod lookbook;
pub mod notification;
pub mod outfit;
pub mod post;
pub mod user;

pub use comment::{CommentRepository, CommentSort};
pub use interaction::InteractionRepository;
pub use lookbook::LookbookRepository;
pub use notification::NotificationRepository;
pub use outfit::OutfitRepository;
pub use post::PostRepository;
pub use user::UserRepository;
