use sea_orm::ActiveValue::Set;

use crate::storage::models::{Comment, Post, User};
use migration::entities::{comment, post, user};

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id.clone()),
        username: Set(user.username.clone()),
        password: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
    }
}

pub fn model_to_post(model: post::Model) -> Post {
    Post {
        id: model.id,
        text: model.text,
        author_id: model.author_id,
        commentable: model.commentable,
        created_at: model.created_at,
    }
}

pub fn post_to_active_model(post: &Post) -> post::ActiveModel {
    post::ActiveModel {
        id: Set(post.id.clone()),
        text: Set(post.text.clone()),
        author_id: Set(post.author_id.clone()),
        commentable: Set(post.commentable),
        created_at: Set(post.created_at),
    }
}

pub fn model_to_comment(model: comment::Model) -> Comment {
    Comment {
        id: model.id,
        comment: model.comment,
        author_id: model.author_id,
        post_id: model.post_id,
        parent_comment_id: model.parent_comment_id,
        created_at: model.created_at,
    }
}

pub fn comment_to_active_model(comment: &Comment) -> comment::ActiveModel {
    comment::ActiveModel {
        id: Set(comment.id.clone()),
        comment: Set(comment.comment.clone()),
        author_id: Set(comment.author_id.clone()),
        post_id: Set(comment.post_id.clone()),
        parent_comment_id: Set(comment.parent_comment_id.clone()),
        created_at: Set(comment.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    #[test]
    fn test_user_model_keeps_hash_internal() {
        let user = model_to_user(user::Model {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password: "$argon2id$abc".to_string(),
            created_at: Utc::now(),
        });
        assert_eq!(user.password_hash, "$argon2id$abc");

        let active = user_to_active_model(&user);
        assert_eq!(active.password, ActiveValue::Set("$argon2id$abc".to_string()));
    }

    #[test]
    fn test_reply_round_trip_keeps_parent() {
        let comment = Comment {
            id: "c2".to_string(),
            comment: "reply".to_string(),
            author_id: "u1".to_string(),
            post_id: "p1".to_string(),
            parent_comment_id: Some("c1".to_string()),
            created_at: Utc::now(),
        };
        let active = comment_to_active_model(&comment);
        assert_eq!(
            active.parent_comment_id,
            ActiveValue::Set(Some("c1".to_string()))
        );
        assert_eq!(active.post_id, ActiveValue::Set("p1".to_string()));
    }
}
