//! Database entities.

#![allow(missing_docs)]

pub mod comment;
pub mod interaction;
pub mod lookbook;
pub mod notification;
pub mod outfit;
pub mod post;
pub mod user;

pub use comment::Entity as Comment;
pub use interaction::Entity as Interaction;
pub use lookbook::Entity as Lookbook;
pub use notification::Entity as Notification;
pub use outfit::Entity as Outfit;
pub use post::Entity as Post;
pub use user::Entity as User;
