use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::models::Claims;

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_access_token(
    username: String,
    employee_id: String,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let iat = now();
    let claims = Claims {
        sub: username,
        employee_id,
        iat,
        exp: iat + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

/// Checks the HS256 signature and `exp` with no leeway.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
