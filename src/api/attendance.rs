use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::attendance::{AttendanceRecord, Mark},
    models::{MarkReqDto, PresenceQuery},
    service::AttendanceService,
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::debug;

impl From<MarkReqDto> for Mark {
    fn from(req: MarkReqDto) -> Self {
        Mark {
            employee_id: req.employee_id,
            date: req.date,
            time: req.time,
            location: req.location,
        }
    }
}

/// Record entry presence
#[utoipa::path(
    post,
    path = "/entry",
    request_body = MarkReqDto,
    responses(
        (status = 201, description = "Entry presence recorded successfully", body = Object, example = json!({
            "message": "Entry presence recorded successfully"
        })),
        (status = 400, description = "Missing or malformed field"),
        (status = 403, description = "Missing or invalid token"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn entry(
    auth: AuthUser,
    attendance: web::Data<AttendanceService>,
    payload: web::Json<MarkReqDto>,
) -> AppResult<impl Responder> {
    debug!(username = %auth.username, "Entry requested");

    attendance.record_entry(payload.into_inner().into()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Entry presence recorded successfully"
    })))
}

/// Record exit presence
#[utoipa::path(
    post,
    path = "/exit",
    request_body = MarkReqDto,
    responses(
        (status = 200, description = "Exit presence recorded successfully", body = Object, example = json!({
            "message": "Exit presence recorded successfully"
        })),
        (status = 400, description = "No entry record found for the given date and employee id", body = Object, example = json!({
            "message": "No entry record found for the given date and employee id"
        })),
        (status = 403, description = "Missing or invalid token"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn exit(
    auth: AuthUser,
    attendance: web::Data<AttendanceService>,
    payload: web::Json<MarkReqDto>,
) -> AppResult<impl Responder> {
    debug!(username = %auth.username, "Exit requested");

    match attendance.record_exit(payload.into_inner().into()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "message": "Exit presence recorded successfully"
        }))),
        // exit before entry is a client error on this endpoint
        Err(AppError::NotFound(message)) => Ok(HttpResponse::BadRequest().json(json!({
            "message": message
        }))),
        Err(e) => Err(e),
    }
}

/// Get the presence record for one employee and day
#[utoipa::path(
    get,
    path = "/presence",
    params(PresenceQuery),
    responses(
        (status = 200, description = "Presence record", body = AttendanceRecord),
        (status = 404, description = "No presence record found", body = Object, example = json!({
            "message": "No presence record found for the given date and employee id"
        })),
        (status = 403, description = "Missing or invalid token"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn presence(
    _auth: AuthUser,
    attendance: web::Data<AttendanceService>,
    query: web::Query<PresenceQuery>,
) -> AppResult<impl Responder> {
    let record = attendance.get_record(&query.employee_id, query.date).await?;
    Ok(web::Json(record))
}
