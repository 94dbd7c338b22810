pub mod attendance;
pub mod employee;
pub mod report;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::Config;
use crate::error::ApiError;

const MAX_CEDULA_LEN: usize = 20;
const MAX_NAME_LEN: usize = 150;
const MAX_TITLE_LEN: usize = 100;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of name, cedula or department
    pub q: Option<String>,
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trims `value` and rejects it when blank or longer than `max` characters.
fn required(field: &str, value: &str, max: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("El campo {field} es obligatorio")));
    }
    if value.chars().count() > max {
        return Err(ApiError::BadRequest(format!(
            "El campo {field} admite como máximo {max} caracteres"
        )));
    }
    Ok(value.to_string())
}

pub(crate) fn cedula(value: &str) -> Result<String, ApiError> {
    required("cedula", value, MAX_CEDULA_LEN)
}

pub(crate) fn nombre(value: &str) -> Result<String, ApiError> {
    required("nombre", value, MAX_NAME_LEN)
}

pub(crate) fn departamento(config: &Config, value: &str) -> Result<String, ApiError> {
    let value = required("departamento", value, MAX_NAME_LEN)?;
    if !config.is_known_department(&value) {
        return Err(ApiError::BadRequest(format!(
            "Departamento desconocido: {value}"
        )));
    }
    Ok(value)
}

/// Blank titles are stored as absent.
pub(crate) fn cargo(value: Option<&str>) -> Result<Option<String>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => required("cargo", v, MAX_TITLE_LEN).map(Some),
        None => Ok(None),
    }
}
