//! API 路由配置
//!
//! 所有路由挂在 `api.prefix` 下，并统一经过 `BearerAuth`。

use std::sync::Arc;

use actix_web::web;

use crate::api::jwt::JwtService;
use crate::api::middleware::BearerAuth;
use crate::services::{CommentService, FeedResolver, PostService, UserService};
use crate::storage::Storage;

use super::health::{AppStartTime, health_check};
use super::helpers::{json_config, query_config};
use super::mutations::{create_comment, create_post, login, register};
use super::queries::{
    get_comment, get_post, get_user, get_user_by_username, get_user_posts, list_comments,
    list_posts, list_users,
};

/// 认证路由 `/auth`
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
}

/// 用户路由 `/users`
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("", web::get().to(list_users))
        .route("/by-username/{username}", web::get().to(get_user_by_username))
        .route("/{id}/posts", web::get().to(get_user_posts))
        .route("/{id}", web::get().to(get_user))
}

/// 帖子路由 `/posts`
pub fn posts_routes() -> actix_web::Scope {
    web::scope("/posts")
        .route("", web::get().to(list_posts))
        .route("", web::post().to(create_post))
        .route("/{id}", web::get().to(get_post))
}

/// 评论路由 `/comments`
pub fn comments_routes() -> actix_web::Scope {
    web::scope("/comments")
        .route("", web::get().to(list_comments))
        .route("", web::post().to(create_comment))
        .route("/{id}", web::get().to(get_comment))
}

/// Everything a worker needs to serve the API. Cheap to clone per worker.
#[derive(Clone)]
pub struct ApiContext {
    pub storage: Arc<dyn Storage>,
    pub jwt: Arc<JwtService>,
    pub prefix: String,
    pub start_time: AppStartTime,
}

impl ApiContext {
    pub fn new(storage: Arc<dyn Storage>, jwt: Arc<JwtService>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            jwt,
            prefix: prefix.into(),
            start_time: AppStartTime::now(),
        }
    }

    /// 注册 app_data 与全部路由，供 `App::configure` 使用
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let storage = self.storage.clone();

        cfg.app_data(web::Data::new(UserService::new(
            storage.clone(),
            self.jwt.clone(),
        )))
        .app_data(web::Data::new(PostService::new(storage.clone())))
        .app_data(web::Data::new(CommentService::new(storage.clone())))
        .app_data(web::Data::new(FeedResolver::new(storage.clone())))
        .app_data(web::Data::new(storage))
        .app_data(web::Data::new(self.start_time.clone()))
        .app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope(&self.prefix)
                .wrap(BearerAuth::new(self.jwt.clone()))
                .route("/health", web::get().to(health_check))
                .service(auth_routes())
                .service(users_routes())
                .service(posts_routes())
                .service(comments_routes()),
        );
    }
}
