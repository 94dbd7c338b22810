use crate::{
    api::{SearchQuery, cedula, departamento, nombre, now, today},
    auth::auth::AuthUser,
    config::Config,
    error::ApiError,
    model::{
        attendance::CheckIn,
        employee::VISITOR_TITLE,
    },
    store::{AttendanceStore, StoreError},
    utils::filter::search_term,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "12345678")]
    pub cedula: String,
    /// Used only when the cedula is not registered yet
    #[schema(example = "Ana Pérez")]
    pub nombre: String,
    #[schema(example = "Auditoria Interna")]
    pub departamento: String,
}

/// Check-in endpoint
///
/// Registers today's entry for the cedula, creating the employee first when unknown.
#[utoipa::path(
    post,
    path = "/asistencia",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Entry recorded", body = crate::model::attendance::AttendanceRecord),
        (status = 400, description = "Invalid payload or already checked in today", body = Object, example = json!({
            "error": "Ya registró entrada hoy"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, ApiError> {
    let entry = CheckIn {
        cedula: cedula(&payload.cedula)?,
        nombre: nombre(&payload.nombre)?,
        departamento: departamento(&config, &payload.departamento)?,
    };

    let record = match store.check_in(&entry, VISITOR_TITLE, now()).await {
        Ok(record) => record,
        Err(StoreError::Duplicate) => {
            info!(cedula = %entry.cedula, "Duplicate check-in rejected");
            return Err(ApiError::Conflict("Ya registró entrada hoy".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(id = record.id, cedula = %record.cedula_empleado, by = %auth.username, "Checked in");

    Ok(HttpResponse::Ok().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/salida/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Exit time stored", body = crate::model::attendance::AttendanceRecord),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "error": "Registro de asistencia no encontrado"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let record = store
        .check_out(id, now())
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro de asistencia no encontrado".to_string()))?;

    info!(id, cedula = %record.cedula_empleado, status = %record.status(), by = %auth.username, "Checked out");

    Ok(HttpResponse::Ok().json(record))
}

/// Today's records, newest entry first
#[utoipa::path(
    get,
    path = "/registros-hoy",
    params(SearchQuery),
    responses(
        (status = 200, description = "Records for the current day", body = [crate::model::attendance::AttendanceRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_today(
    store: web::Data<dyn AttendanceStore>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let rows = store
        .list_day(today(), search_term(query.q.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Delete every record of the current day
#[utoipa::path(
    delete,
    path = "/vaciar-hoy",
    responses(
        (status = 200, description = "Records removed", body = Object, example = json!({
            "message": "Registros de hoy vaciados",
            "eliminados": 4
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clear_today(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, ApiError> {
    let day = today();
    let removed = store.clear_day(day).await?;

    info!(%day, removed, by = %auth.username, "Cleared today's attendance");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Registros de hoy vaciados",
        "eliminados": removed
    })))
}
