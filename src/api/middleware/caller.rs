//! Caller identity middleware
//!
//! Resolves the bearer token once per request and stores the resulting
//! [`Caller`] in request extensions. It never rejects a request: an absent or
//! unknown token just yields an anonymous caller, and the handlers decide.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::trace;

use crate::auth::{Caller, TokenStore};

#[derive(Clone)]
pub struct CallerIdentity {
    tokens: TokenStore,
}

impl CallerIdentity {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CallerIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CallerIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallerIdentityMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct CallerIdentityMiddleware<S> {
    service: Rc<S>,
    tokens: TokenStore,
}

/// 从 Authorization header 提取 token，`Bearer ` 前缀可省略
pub fn extract_token(req: &ServiceRequest) -> Option<String> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for CallerIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
        let tokens = self.tokens.clone();

        Box::pin(async move {
            // 每个请求都重新查询，撤销立即生效
            let token = extract_token(&req);
            let caller = tokens.resolve_caller(token.as_deref()).await;
            trace!("Request {} {} as {}", req.method(), req.path(), caller.role);

            req.extensions_mut().insert(caller);
            srv.call(req).await
        })
    }
}

/// The caller stored by [`CallerIdentity`], anonymous if the middleware did not run
pub fn caller_of(req: &actix_web::HttpRequest) -> Caller {
    req.extensions()
        .get::<Caller>()
        .cloned()
        .unwrap_or_else(Caller::anonymous)
}
