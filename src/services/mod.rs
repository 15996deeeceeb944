//! Service layer for business logic
//!
//! Thin validation on top of [`Storage`](crate::storage::Storage), plus the
//! feed resolver that assembles nested user / post / comment views.

mod comment_service;
mod post_service;
mod resolver;
mod user_service;
mod views;

pub use comment_service::*;
pub use post_service::*;
pub use resolver::*;
pub use user_service::*;
pub use views::*;
