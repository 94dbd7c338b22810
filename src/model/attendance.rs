use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A record is open until its check-out time is set; there is no way back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    CheckedIn,
    CheckedOut,
}

impl AttendanceStatus {
    pub fn of(hora_salida: Option<NaiveDateTime>) -> Self {
        match hora_salida {
            Some(_) => AttendanceStatus::CheckedOut,
            None => AttendanceStatus::CheckedIn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "12345678")]
    pub cedula_empleado: String,

    #[schema(example = "2026-10-17", value_type = String, format = "date")]
    pub fecha: NaiveDate,

    #[schema(example = "2026-10-17T08:02:11", value_type = String, format = "date-time")]
    pub hora_entrada: NaiveDateTime,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub hora_salida: Option<NaiveDateTime>,
}

impl AttendanceRecord {
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::of(self.hora_salida)
    }
}

/// Attendance record joined with the owning employee, as listed for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRow {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "2026-10-17T08:02:11", value_type = String, format = "date-time")]
    pub hora_entrada: NaiveDateTime,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub hora_salida: Option<NaiveDateTime>,

    #[schema(example = "Ana Pérez")]
    pub nombre: String,

    #[schema(example = "12345678")]
    pub cedula: String,

    #[schema(example = "Auditoria Interna")]
    pub departamento: String,
}

impl AttendanceRow {
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::of(self.hora_salida)
    }
}

/// What a check-in submits: enough to create the employee on the fly.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub cedula: String,
    pub nombre: String,
    pub departamento: String,
}
