//! Read endpoints
//!
//! Every list / detail endpoint returns the nested view built by
//! [`FeedResolver`]; `limit` / `offset` apply at each level of nesting.

use actix_web::{HttpResponse, web};

use crate::config::get_config;
use crate::services::FeedResolver;
use crate::storage::Pagination;

use super::helpers::api_result;
use super::types::PageQuery;

fn page(query: web::Query<PageQuery>) -> Pagination {
    query
        .into_inner()
        .to_pagination(get_config().api.max_page_size)
}

pub async fn list_users(
    resolver: web::Data<FeedResolver>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.users(page(query)).await)
}

pub async fn get_user(
    resolver: web::Data<FeedResolver>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.user(&path, page(query)).await)
}

pub async fn get_user_by_username(
    resolver: web::Data<FeedResolver>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.user_by_username(&path, page(query)).await)
}

pub async fn get_user_posts(
    resolver: web::Data<FeedResolver>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.posts_by_user_id(&path, page(query)).await)
}

pub async fn list_posts(
    resolver: web::Data<FeedResolver>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.posts(page(query)).await)
}

pub async fn get_post(
    resolver: web::Data<FeedResolver>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.post(&path, page(query)).await)
}

pub async fn list_comments(
    resolver: web::Data<FeedResolver>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.comments(page(query)).await)
}

pub async fn get_comment(
    resolver: web::Data<FeedResolver>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    api_result(resolver.comment(&path, page(query)).await)
}
