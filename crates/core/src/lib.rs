//! Business logic for curator.
//!
//! Services sit between the HTTP layer and the repositories. The
//! interaction ledger lives here: [`InteractionService`] owns toggle,
//! membership, counting and reconciliation over like/save/follow/
//! comment-like edges, and [`FollowingService`] layers the explicit
//! follow/unfollow semantics on top of it.

pub mod services;

pub use services::*;
