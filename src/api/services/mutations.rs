//! Write endpoints: register, login, post, comment

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::api::middleware::AuthenticatedUser;
use crate::errors::ThreadlineError;
use crate::services::{CommentService, PostService, TokenView, UserService};

use super::helpers::{created_response, success_response};
use super::types::{CreateCommentRequest, CreatePostRequest, Credentials};

pub async fn register(
    users: web::Data<UserService>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ThreadlineError> {
    let user = users.register(&body.username, &body.password).await?;
    Ok(created_response(user))
}

pub async fn login(
    users: web::Data<UserService>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ThreadlineError> {
    let token = users.login(&body.username, &body.password).await?;
    info!("User {} logged in", body.username);
    Ok(success_response(TokenView::bearer(
        token,
        users.token_hours(),
    )))
}

pub async fn create_post(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, ThreadlineError> {
    let post = posts
        .create_post(&user.id, &body.text, body.commentable)
        .await?;
    Ok(created_response(post))
}

pub async fn create_comment(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, ThreadlineError> {
    let comment = comments
        .create_comment(&user.id, &body.item_id, &body.comment)
        .await?;
    Ok(created_response(comment))
}
