use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::{AppError, AppResult},
    model::employee::NewEmployee,
    models::{LoginReqDto, LoginResponse, PhotoForm, PhotoResponse, RegisterForm},
    service::AuthService,
    utils::photo::{self, Photo},
};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, web};
use futures_util::StreamExt;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Text parts are small; anything longer is a client error.
const MAX_TEXT_FIELD: usize = 1024;

/// Text fields plus the optional photo of a multipart form.
struct FormParts {
    fields: HashMap<String, String>,
    photo: Option<Photo>,
}

impl FormParts {
    fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

async fn read_form(mut payload: Multipart, max_photo_bytes: usize) -> AppResult<FormParts> {
    let mut parts = FormParts {
        fields: HashMap::new(),
        photo: None,
    };

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::validation(format!("Malformed form data: {e}")))?;
        let name = field.name().unwrap_or_default().to_owned();

        if name == "photo" {
            parts.photo = Some(photo::read_photo(field, max_photo_bytes).await?);
            continue;
        }

        let mut value = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::validation(format!("Malformed form data: {e}")))?;
            if value.len() + chunk.len() > MAX_TEXT_FIELD {
                return Err(AppError::validation(format!("{name} is too long")));
            }
            value.extend_from_slice(&chunk);
        }

        let value = String::from_utf8(value)
            .map_err(|_| AppError::validation(format!("{name} must be valid UTF-8")))?;
        parts.fields.insert(name, value);
    }

    Ok(parts)
}

/// User registration handler
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered successfully", body = Object, example = json!({
            "message": "User registered successfully",
            "employee_id": "E1"
        })),
        (status = 400, description = "Duplicate username, missing field or invalid image", body = Object, example = json!({
            "message": "Username already exists"
        })),
        (status = 500, description = "Database error")
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: Multipart,
    auth: web::Data<AuthService>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let mut form = read_form(payload, config.photo_max_bytes).await?;
    debug!(fields = ?form.fields.keys().collect::<Vec<_>>(), has_photo = form.photo.is_some(), "Register form read");

    let upload = form.photo.take();
    let photo_reference = upload.as_ref().map(photo::new_reference);

    let new = NewEmployee {
        username: form.take("username"),
        password: form.take("password"),
        employee_id: form.take("employee_id"),
        full_name: form.take("full_name"),
        department: form.take("department"),
        photo_reference: photo_reference.clone(),
    };

    if let (Some(upload), Some(reference)) = (upload, photo_reference.as_deref()) {
        photo::save(&config.upload_dir, reference, upload).await?;
    }

    match auth.register(new).await {
        Ok(employee) => Ok(HttpResponse::Created().json(json!({
            "message": "User registered successfully",
            "employee_id": employee.employee_id
        }))),
        Err(e) => {
            if let Some(reference) = photo_reference.as_deref() {
                photo::discard(&config.upload_dir, reference).await;
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid username or password", body = Object, example = json!({
            "message": "Invalid username or password"
        })),
        (status = 500, description = "Database error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "http_login",
    skip(auth, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    auth: web::Data<AuthService>,
) -> AppResult<impl Responder> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(AppError::validation("Username and password are required"));
    }

    let session = auth.login(&user.username, &user.password).await?;

    info!("Login successful");
    Ok(web::Json(session))
}

/// Replace the caller's profile photo
#[utoipa::path(
    post,
    path = "/photo",
    request_body(content = PhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo updated", body = PhotoResponse),
        (status = 400, description = "Missing or invalid image"),
        (status = 403, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn update_photo(
    user: AuthUser,
    payload: Multipart,
    auth: web::Data<AuthService>,
    config: web::Data<Config>,
) -> AppResult<impl Responder> {
    let mut form = read_form(payload, config.photo_max_bytes).await?;
    let upload = form
        .photo
        .take()
        .ok_or_else(|| AppError::validation("photo is required"))?;

    let reference = photo::new_reference(&upload);
    photo::save(&config.upload_dir, &reference, upload).await?;

    let (employee, previous) = match auth.update_photo(&user.username, &reference).await {
        Ok(updated) => updated,
        Err(e) => {
            photo::discard(&config.upload_dir, &reference).await;
            return Err(e);
        }
    };

    if let Some(previous) = previous.filter(|p| *p != reference) {
        photo::discard(&config.upload_dir, &previous).await;
    }

    info!(username = %user.username, "Photo updated");

    Ok(web::Json(PhotoResponse {
        photo_url: auth
            .photo_url(&employee)
            .unwrap_or_else(|| photo::public_url(&config.photo_base_url, &reference)),
    }))
}
