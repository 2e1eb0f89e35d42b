use crate::auth::auth::token_from_headers;
use crate::error::AppError;
use crate::service::AuthService;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::debug;

/// Rejects requests without a valid session token with 403 and stores the
/// resulting `AuthUser` in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let auth = req
        .app_data::<Data<AuthService>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Auth service missing".into()))?;

    let token = match token_from_headers(req.headers()) {
        Some(t) => t.to_owned(),
        None => {
            debug!(path = %req.path(), "Missing Authorization header");
            let resp = AppError::Unauthorized("Missing Authorization header".into()).error_response();
            return Ok(req.into_response(resp));
        }
    };

    let auth_user = match auth.authenticate(&token) {
        Ok(user) => user,
        Err(e) => {
            return Ok(req.into_response(e.error_response()));
        }
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
