use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::io;
use std::sync::Arc;

use presensi::config::Config;
use presensi::db::{ensure_schema, init_db};
use presensi::docs::ApiDoc;
use presensi::routes;
use presensi::service::{AttendanceService, AuthService};
use presensi::store::MySqlStore;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Presensi API is running"
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{e:#}")))?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await.map_err(|e| {
        error!(error = %e, "Failed to connect to database");
        io::Error::other(e)
    })?;
    ensure_schema(&pool).await.map_err(|e| {
        error!(error = %e, "Failed to prepare database schema");
        io::Error::other(e)
    })?;

    let store = Arc::new(MySqlStore::new(pool));
    let auth = Data::new(AuthService::new(store.clone(), &config));
    let attendance = Data::new(AttendanceService::new(store));

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(routes::build_cors(&config.cors_origin))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(auth.clone())
            .app_data(attendance.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
