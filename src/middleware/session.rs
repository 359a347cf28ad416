//! Session guard: resolves the calling user from the access token and stashes
//! the sanitized row in request extensions.
//!
//! The token is read from the `access_token` cookie first, then from the
//! `Authorization: Bearer` header, so both browser and API clients work.
//! Routes outside a guarded scope can still take `Option<CurrentUser>`; the
//! extractor falls back to resolving the token itself.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::PublicUser;
use crate::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// The authenticated user, inserted by [`SessionGuard`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

/// Cookie first, then Bearer header. Returns an owned token so no request
/// borrow stays alive across a later `extensions_mut` call.
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Verify the access token and load the sanitized user row.
async fn resolve(req: &HttpRequest) -> Result<CurrentUser, Error> {
    let token = extract_token(req).ok_or_else(|| {
        Error::from(AppError::Authentication("missing access token".to_string()))
    })?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| {
            Error::from(AppError::Internal(
                "application state not configured".to_string(),
            ))
        })?;

    let claims = state.tokens.signer().verify_access(&token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        Error::from(e)
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::from(AppError::Authentication("invalid access token".to_string())))?;

    let user = user_repo::find_public_by_id(&state.db, user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            Error::from(AppError::Authentication("invalid access token".to_string()))
        })?;

    Ok(CurrentUser(user))
}

pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(SessionGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let current = resolve(req.request()).await?;

            // All request borrows are dropped; extensions_mut is now safe.
            req.extensions_mut().insert(current);

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<CurrentUser>().cloned() {
            return Box::pin(async move { Ok(user) });
        }
        let req = req.clone();
        Box::pin(async move { resolve(&req).await })
    }
}
