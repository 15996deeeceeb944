//! Bearer token authentication
//!
//! The middleware never rejects anonymous requests. It only attaches an
//! [`AuthenticatedUser`] to the request when a valid token is presented, and
//! rejects requests that present a malformed or invalid one. Handlers that
//! need a user take `AuthenticatedUser` as an extractor.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, trace};

use crate::api::jwt::JwtService;
use crate::api::services::error_from_threadline;
use crate::errors::ThreadlineError;

/// 通过 token 认证的当前用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ThreadlineError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| ThreadlineError::unauthorized("authentication required")),
        )
    }
}

/// Bearer token middleware factory
#[derive(Clone)]
pub struct BearerAuth {
    jwt: Arc<JwtService>,
}

impl BearerAuth {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
}

/// Authorization header 的三种情况
enum Presented {
    Nothing,
    Token(String),
    Malformed,
}

fn presented_token(req: &ServiceRequest) -> Presented {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Presented::Nothing;
    };
    value
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| Presented::Token(t.trim().to_string()))
        .unwrap_or(Presented::Malformed)
}

fn invalid_token<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    let err = ThreadlineError::invalid_token("Invalid token");
    req.into_response(error_from_threadline(&err).map_into_right_body())
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        match presented_token(&req) {
            Presented::Nothing => {
                trace!("Anonymous request to {}", req.path());
            }
            Presented::Malformed => {
                info!("Rejected Authorization header without Bearer prefix");
                return Box::pin(async move { Ok(invalid_token(req)) });
            }
            Presented::Token(token) => match self.jwt.validate_token(&token) {
                Ok(claims) => {
                    trace!("Bearer token accepted for user {}", claims.sub);
                    req.extensions_mut()
                        .insert(AuthenticatedUser { id: claims.sub });
                }
                Err(e) => {
                    info!("Bearer token validation failed: {}", e);
                    return Box::pin(async move { Ok(invalid_token(req)) });
                }
            },
        }

        Box::pin(async move { srv.call(req).await.map(|res| res.map_into_left_body()) })
    }
}
