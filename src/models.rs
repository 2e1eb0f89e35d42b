use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::clock;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Alice Santoso")]
    pub full_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "/uploads/3f2b1c9e.png", nullable = true)]
    pub photo_url: Option<String>,
}

/// Multipart fields for `POST /register`; documentation only, the handler
/// reads the parts as a stream.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct RegisterForm {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(example = "Alice Santoso")]
    pub full_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    /// jpeg or png
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

/// Multipart body for `POST /photo`; documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PhotoForm {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    #[schema(example = "/uploads/3f2b1c9e.png")]
    pub photo_url: String,
}

/// Body of `POST /entry` and `POST /exit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkReqDto {
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub date: NaiveDate,
    #[serde(with = "clock")]
    #[schema(value_type = String, example = "08:00")]
    pub time: NaiveTime,
    #[schema(example = "-6.2088,106.8456")]
    pub location: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PresenceQuery {
    /// Employee id
    pub employee_id: String,
    /// Day in YYYY-MM-DD
    #[param(value_type = String, format = "date")]
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// username
    pub sub: String,
    pub employee_id: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
