//! HTTP API 集成测试
//!
//! 完整的 App（BearerAuth + 全部路由）跑在 MemoryStorage 上。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, dev::ServiceResponse};
use serde_json::{Value, json};

use threadline::api::jwt::JwtService;
use threadline::api::services::ApiContext;
use threadline::storage::{MemoryStorage, Storage};

fn context() -> ApiContext {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let jwt = Arc::new(JwtService::new("api-test-secret", 1));
    ApiContext::new(storage, jwt, "/api")
}

macro_rules! init_app {
    ($ctx:expr) => {{
        let ctx = $ctx.clone();
        test::init_service(App::new().configure(move |cfg| ctx.configure(cfg))).await
    }};
}

async fn body_json(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

// =============================================================================
// Auth
// =============================================================================

#[actix_web::test]
async fn test_register_login_flow() {
    let app = init_app!(context());

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password_hash").is_none());

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["code"], 3001);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 3600);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["code"], 2000);
}

#[actix_web::test]
async fn test_register_validation() {
    let app = init_app!(context());

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], 1000);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], 1000);
}

#[actix_web::test]
async fn test_mutations_require_token() {
    let app = init_app!(context());

    let req = TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"text": "anonymous"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["code"], 1001);

    let req = TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({"comment": "hi", "item_id": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_invalid_token_is_forbidden() {
    let app = init_app!(context());

    let req = TestRequest::get()
        .uri("/api/posts")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["code"], 2002);

    let req = TestRequest::get()
        .uri("/api/posts")
        .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 其他密钥签发的 token 同样无效
    let foreign = JwtService::new("another-secret", 1)
        .generate_token("someone")
        .unwrap();
    let req = TestRequest::get()
        .uri("/api/posts")
        .insert_header(bearer(&foreign))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Posts & comments
// =============================================================================

// test::init_service 返回的 Service 类型无法具名，辅助逻辑用宏展开

/// 注册并登录，返回 (user_id, token)
macro_rules! register_and_login {
    ($app:expr, $username:expr) => {{
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"username": $username, "password": "pw"}))
            .to_request();
        let body = body_json(test::call_service($app, req).await).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": $username, "password": "pw"}))
            .to_request();
        let body = body_json(test::call_service($app, req).await).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        (id, token)
    }};
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $token:expr, $payload:expr $(,)?) => {{
        let req = TestRequest::post()
            .uri($uri)
            .insert_header(bearer($token))
            .set_json($payload)
            .to_request();
        test::call_service($app, req).await
    }};
}

#[actix_web::test]
async fn test_post_comment_reply_thread() {
    let app = init_app!(context());
    let (alice_id, alice) = register_and_login!(&app, "alice");
    let (_, bob) = register_and_login!(&app, "bob");

    let resp = post_json!(&app, "/api/posts", &alice, json!({"text": "hello world"}));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post = body_json(resp).await["data"].clone();
    assert_eq!(post["author_id"], alice_id.as_str());
    assert_eq!(post["commentable"], true);
    let post_id = post["id"].as_str().unwrap().to_string();

    let resp = post_json!(
        &app,
        "/api/comments",
        &bob,
        json!({"comment": "first!", "item_id": post_id}),
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let top = body_json(resp).await["data"].clone();
    assert_eq!(top["post_id"], post_id.as_str());
    assert!(top["parent_comment_id"].is_null());
    let top_id = top["id"].as_str().unwrap().to_string();

    let resp = post_json!(
        &app,
        "/api/comments",
        &alice,
        json!({"comment": "welcome", "item_id": top_id}),
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reply = body_json(resp).await["data"].clone();
    assert_eq!(reply["post_id"], post_id.as_str());
    assert_eq!(reply["parent_comment_id"], top_id.as_str());

    let req = TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view = body_json(resp).await["data"].clone();
    assert_eq!(view["author"]["username"], "alice");
    assert_eq!(view["comments"].as_array().unwrap().len(), 1);
    assert_eq!(view["comments"][0]["author"]["username"], "bob");
    assert_eq!(view["comments"][0]["replies"][0]["comment"], "welcome");

    let req = TestRequest::get()
        .uri("/api/users/by-username/alice")
        .to_request();
    let view = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(view["id"], alice_id.as_str());
    assert_eq!(view["posts"].as_array().unwrap().len(), 1);

    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/posts", alice_id))
        .to_request();
    let posts = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(posts.as_array().unwrap().len(), 1);

    let req = TestRequest::get()
        .uri(&format!("/api/comments/{}", top_id))
        .to_request();
    let comment = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(comment["replies"].as_array().unwrap().len(), 1);
}

// token 签名有效但用户不存在（例如内存存储重启后）
#[actix_web::test]
async fn test_token_for_unknown_user_cannot_publish() {
    let app = init_app!(context());
    let (_, alice) = register_and_login!(&app, "alice");
    let resp = post_json!(&app, "/api/posts", &alice, json!({"text": "real post"}));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post_id = body_json(resp).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let stale = JwtService::new("api-test-secret", 1)
        .generate_token("vanished-user")
        .unwrap();

    let resp = post_json!(&app, "/api/posts", &stale, json!({"text": "orphan"}));
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["code"], 1001);

    let resp = post_json!(
        &app,
        "/api/comments",
        &stale,
        json!({"comment": "orphan", "item_id": post_id}),
    );
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 列表不受影响
    for uri in ["/api/posts", "/api/comments", "/api/users"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
    let req = TestRequest::get().uri("/api/posts").to_request();
    let posts = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(posts.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_comments_disabled_and_unknown_item() {
    let app = init_app!(context());
    let (_, alice) = register_and_login!(&app, "alice");

    let resp = post_json!(
        &app,
        "/api/posts",
        &alice,
        json!({"text": "read only", "commentable": false}),
    );
    let post_id = body_json(resp).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = post_json!(
        &app,
        "/api/comments",
        &alice,
        json!({"comment": "can I?", "item_id": post_id}),
    );
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["code"], 4001);

    let resp = post_json!(
        &app,
        "/api/comments",
        &alice,
        json!({"comment": "hello", "item_id": "does-not-exist"}),
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], 4000);
}

#[actix_web::test]
async fn test_pagination_and_not_found() {
    let app = init_app!(context());
    let (_, alice) = register_and_login!(&app, "alice");
    for i in 0..3 {
        post_json!(&app, "/api/posts", &alice, json!({"text": format!("post {}", i)}));
    }

    let req = TestRequest::get().uri("/api/posts?limit=2").to_request();
    let page = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(page.as_array().unwrap().len(), 2);

    let req = TestRequest::get()
        .uri("/api/posts?limit=2&offset=2")
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await["data"].clone();
    assert_eq!(page.as_array().unwrap().len(), 1);

    let req = TestRequest::get().uri("/api/posts?limit=abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get().uri("/api/posts/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], 1004);

    let req = TestRequest::get().uri("/api/users/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[actix_web::test]
async fn test_health_reports_counts() {
    let app = init_app!(context());
    register_and_login!(&app, "alice");

    let req = TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "memory");
    assert_eq!(body["data"]["storage"]["users"], 1);
    assert_eq!(body["data"]["storage"]["posts"], 0);
}
