use crate::{error::AppError, service::AuthService};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest,
    dev::Payload,
    http::header::{AUTHORIZATION, HeaderMap},
    web::Data,
};
use futures::future::{Ready, ready};

/// Identity carried by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub employee_id: String,
}

/// Token from the `Authorization` header, with or without a `Bearer` scheme.
/// The scheme is matched case-insensitively.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match value.split_at_checked(6) {
        Some((scheme, rest))
            if scheme.eq_ignore_ascii_case("bearer")
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest.trim()
        }
        _ => value,
    };

    if token.is_empty() { None } else { Some(token) }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by auth_middleware on protected routes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match token_from_headers(req.headers()) {
            Some(t) => t,
            None => return ready(Err(AppError::Unauthorized("Missing token".into()).into())),
        };

        let auth = match req.app_data::<Data<AuthService>>() {
            Some(a) => a,
            None => {
                return ready(Err(
                    AppError::Internal("Auth service missing".into()).into()
                ));
            }
        };

        ready(auth.authenticate(token).map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_token_from_headers() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "abc.def.ghi"))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(token_from_headers(req.headers()), None);
    }

    #[test]
    fn test_token_scheme_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "BEARER   abc.def.ghi  "))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer"))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), None);

        // a bare token that happens to start with the scheme letters
        let req = TestRequest::default()
            .insert_header(("Authorization", "bearerish.token"))
            .to_http_request();
        assert_eq!(token_from_headers(req.headers()), Some("bearerish.token"));
    }
}
