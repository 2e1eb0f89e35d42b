use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::{LoginReqDto, LoginResponse, MarkReqDto, PhotoForm, PhotoResponse, RegisterForm};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi API",
        version = "1.0.0",
        description = r#"
## Employee Attendance (Presensi) API

Daily check-in and check-out tracking for employees.

### 🔹 Key Features
- **Registration & Login**
  - Register with an employee profile and optional photo (jpeg/png)
  - Log in to receive a session token valid for 3 hours
- **Attendance**
  - Record entry and exit with time and location
  - Look up the presence record for an employee and day

### 🔐 Security
Attendance endpoints require the session token in the `Authorization`
header (`Bearer <token>`). Missing or invalid tokens get **403**.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::update_photo,

        crate::api::attendance::entry,
        crate::api::attendance::exit,
        crate::api::attendance::presence
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            RegisterForm,
            PhotoForm,
            PhotoResponse,
            MarkReqDto,
            AttendanceRecord,
            AttendanceStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();

        for path in ["/register", "/login", "/photo", "/entry", "/exit", "/presence"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
