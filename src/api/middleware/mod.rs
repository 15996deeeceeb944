pub mod auth;
pub mod timing;

pub use auth::{AuthenticatedUser, BearerAuth};
pub use timing::TimingMiddleware;
