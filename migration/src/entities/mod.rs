pub mod comment;
pub mod post;
pub mod user;

pub use comment::Entity as CommentEntity;
pub use post::Entity as PostEntity;
pub use user::Entity as UserEntity;
