use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Title given to employees created through the admin form without one.
pub const DEFAULT_TITLE: &str = "Empleado";

/// Title given to employees created implicitly by their first check-in.
pub const VISITOR_TITLE: &str = "Visitante / Nuevo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "cedula": "12345678",
        "nombre": "Ana Pérez",
        "departamento": "Auditoria Interna",
        "cargo": "Analista"
    })
)]
pub struct Employee {
    /// Citizen identifier, the natural key.
    #[schema(example = "12345678")]
    pub cedula: String,

    #[schema(example = "Ana Pérez")]
    pub nombre: String,

    #[schema(example = "Auditoria Interna")]
    pub departamento: String,

    #[schema(example = "Analista", nullable = true)]
    pub cargo: Option<String>,
}
