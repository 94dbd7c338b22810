use crate::{
    api::{SearchQuery, now, today},
    auth::auth::AuthUser,
    config::Config,
    error::ApiError,
    model::{
        attendance::{AttendanceRow, AttendanceStatus},
        employee::Employee,
    },
    store::AttendanceStore,
    utils::{filter::search_term, format},
};
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

const EXPORT_TITLE: &str = "Registro de Asistencia";
const EXPORT_HEADERS: [&str; 5] = ["Nombre", "Cédula", "Departamento", "Entrada", "Salida"];
const NOT_CHECKED_OUT: &str = "-";
const EXPORT_NOT_CHECKED_OUT: &str = "Sin marcar";
const NO_TITLE: &str = "Sin cargo";

/// Attendance row as shown in the dashboard table.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRowView {
    pub id: u64,
    pub nombre: String,
    #[schema(example = "V- 12345678")]
    pub cedula: String,
    pub departamento: String,
    #[schema(example = "17/10/2026 08:02:11")]
    pub entrada: String,
    #[schema(example = "-")]
    pub salida: String,
    pub estado: AttendanceStatus,
    /// Whether the check-out action is offered for this row
    pub puede_marcar_salida: bool,
}

impl From<&AttendanceRow> for AttendanceRowView {
    fn from(row: &AttendanceRow) -> Self {
        Self {
            id: row.id,
            nombre: row.nombre.clone(),
            cedula: format::cedula(&row.cedula),
            departamento: row.departamento.clone(),
            entrada: format::timestamp(row.hora_entrada),
            salida: row
                .hora_salida
                .map(format::timestamp)
                .unwrap_or_else(|| NOT_CHECKED_OUT.to_string()),
            estado: row.status(),
            puede_marcar_salida: row.status() == AttendanceStatus::CheckedIn,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeRowView {
    /// Raw cedula, used as the key for edit and delete
    pub cedula: String,
    #[schema(example = "V- 12345678")]
    pub cedula_visible: String,
    pub nombre: String,
    pub departamento: String,
    #[schema(example = "Sin cargo")]
    pub cargo: String,
}

impl From<&Employee> for EmployeeRowView {
    fn from(e: &Employee) -> Self {
        Self {
            cedula: e.cedula.clone(),
            cedula_visible: format::cedula(&e.cedula),
            nombre: e.nombre.clone(),
            departamento: e.departamento.clone(),
            cargo: e.cargo.clone().unwrap_or_else(|| NO_TITLE.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    #[schema(example = "sábado, 17 de octubre de 2026")]
    pub fecha: String,
    /// Number of attendance rows listed
    pub contador: usize,
    pub registros: Vec<AttendanceRowView>,
    pub empleados: Vec<EmployeeRowView>,
    pub departamentos: Vec<String>,
}

/// Content of the printable attendance sheet for one day.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportDocument {
    #[schema(example = "Registro de Asistencia")]
    pub titulo: String,
    #[schema(example = "sábado, 17 de octubre de 2026")]
    pub fecha: String,
    pub total: usize,
    #[schema(example = "17/10/2026 17:45:03")]
    pub generado: String,
    pub encabezados: Vec<String>,
    pub filas: Vec<Vec<String>>,
    #[schema(example = "asistencia_2026-10-17.pdf")]
    pub nombre_archivo: String,
}

impl ExportDocument {
    fn build(day: NaiveDate, generated: NaiveDateTime, rows: &[AttendanceRow]) -> Self {
        let filas = rows
            .iter()
            .map(|r| {
                vec![
                    r.nombre.clone(),
                    format::cedula(&r.cedula),
                    r.departamento.clone(),
                    format::timestamp(r.hora_entrada),
                    r.hora_salida
                        .map(format::timestamp)
                        .unwrap_or_else(|| EXPORT_NOT_CHECKED_OUT.to_string()),
                ]
            })
            .collect();

        Self {
            titulo: EXPORT_TITLE.to_string(),
            fecha: format::long_date(day),
            total: rows.len(),
            generado: format::timestamp(generated),
            encabezados: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            filas,
            nombre_archivo: format::export_file_name(day),
        }
    }
}

fn nothing_to_export() -> ApiError {
    ApiError::NotFound("No hay registros para exportar".to_string())
}

/// Selectable departments
#[utoipa::path(
    get,
    path = "/departamentos",
    responses(
        (status = 200, description = "Configured department names", body = [String])
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn departments(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok().json(&config.departments)
}

/// Everything the administration page renders, already formatted
#[utoipa::path(
    get,
    path = "/panel",
    params(SearchQuery),
    responses(
        (status = 200, description = "Dashboard content", body = DashboardView),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn dashboard(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let day = today();
    let search = search_term(query.q.as_deref());

    let rows = store.list_day(day, search).await?;
    let employees = store.list_employees(search).await?;

    Ok(HttpResponse::Ok().json(DashboardView {
        fecha: format::long_date(day),
        contador: rows.len(),
        registros: rows.iter().map(AttendanceRowView::from).collect(),
        empleados: employees.iter().map(EmployeeRowView::from).collect(),
        departamentos: config.departments.clone(),
    }))
}

/// Today's attendance sheet
#[utoipa::path(
    get,
    path = "/exportar",
    responses(
        (status = 200, description = "Document content", body = ExportDocument),
        (status = 404, description = "No records today", body = Object, example = json!({
            "error": "No hay registros para exportar"
        }))
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export(store: web::Data<dyn AttendanceStore>) -> Result<HttpResponse, ApiError> {
    let day = today();
    let rows = store.list_day(day, None).await?;

    if rows.is_empty() {
        return Err(nothing_to_export());
    }

    Ok(HttpResponse::Ok().json(ExportDocument::build(day, now(), &rows)))
}

/// Today's attendance sheet, deleting the exported records in the same transaction
#[utoipa::path(
    post,
    path = "/exportar-y-vaciar",
    responses(
        (status = 200, description = "Document content; records were removed", body = ExportDocument),
        (status = 404, description = "No records today", body = Object, example = json!({
            "error": "No hay registros para exportar"
        })),
        (status = 500, description = "Internal server error, nothing was removed")
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_and_clear(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, ApiError> {
    let day = today();
    let rows = store.drain_day(day).await?;

    if rows.is_empty() {
        return Err(nothing_to_export());
    }

    info!(%day, removed = rows.len(), by = %auth.username, "Exported and cleared today's attendance");

    Ok(HttpResponse::Ok().json(ExportDocument::build(day, now(), &rows)))
}
