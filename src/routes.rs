use crate::{
    api::attendance,
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{http::header, middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // period and burst are both >= 1 here
        .expect("valid governor quota");
    Governor::new(&cfg)
}

/// CORS for the browser client: one origin (or `*`), the API's methods and
/// the two headers it reads.
pub fn build_cors(origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

    match origin.trim().trim_end_matches('/') {
        "" | "*" => cors.allow_any_origin(),
        origin => cors.allowed_origin(origin),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Malformed JSON bodies and query strings use the common error body
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    );

    // Public routes
    cfg.service(
        web::resource("/register")
            .wrap(register_limiter)
            .route(web::post().to(handlers::register)),
    )
    .service(
        web::resource("/login")
            .wrap(login_limiter)
            .route(web::post().to(handlers::login)),
    );

    // Protected routes: token check first, rate limit outermost
    cfg.service(
        web::resource("/entry")
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter.clone())
            .route(web::post().to(attendance::entry)),
    )
    .service(
        web::resource("/exit")
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter.clone())
            .route(web::post().to(attendance::exit)),
    )
    .service(
        web::resource("/presence")
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter.clone())
            .route(web::get().to(attendance::presence)),
    )
    .service(
        web::resource("/photo")
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .route(web::post().to(handlers::update_photo)),
    );
}

// LOGIN
//  └─ token (3 h, no refresh)

// API REQUEST
//  └─ Authorization: Bearer token   (bare token also accepted)

// TOKEN EXPIRED
//  └─ 403, log in again

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_limiter_accepts_extreme_rates() {
        // zero clamps to one request a minute; huge rates floor at 1 ms
        build_limiter(0);
        build_limiter(60);
        build_limiter(u32::MAX);
    }
}
