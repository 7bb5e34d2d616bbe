//! HTTP API layer for curator.
//!
//! - **Endpoints**: REST API for posts, outfits, lookbooks, comments,
//!   follows and notifications
//! - **Extractors**: Authentication
//! - **Middleware**: Bearer-token auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
