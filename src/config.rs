use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, fmt::Display, str::FromStr};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    /// Session token lifetime in seconds
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    // Profile photos
    pub upload_dir: String,
    pub photo_base_url: String,
    pub photo_max_bytes: usize,

    /// Browser origin allowed by CORS; `*` allows any origin
    pub cors_origin: String,

    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", "10800")?, // default 3 h

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60")?,
            rate_register_per_min: parsed("RATE_REGISTER_PER_MIN", "30")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".to_string()),
            photo_base_url: env::var("PHOTO_BASE_URL").unwrap_or_else(|_| "/uploads".to_string()),
            photo_max_bytes: parsed("PHOTO_MAX_BYTES", "2097152")?, // 2 MiB

            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}"))
}
