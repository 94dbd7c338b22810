use chrono::{Datelike, NaiveDate, NaiveDateTime};

const WEEKDAYS: [&str; 7] = [
    "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
];

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

/// `15/01/2024 09:30:00`
pub fn timestamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// `sábado, 17 de octubre de 2026`
pub fn long_date(day: NaiveDate) -> String {
    let weekday = WEEKDAYS[day.weekday().num_days_from_monday() as usize];
    let month = MONTHS[day.month0() as usize];
    format!("{weekday}, {} de {month} de {}", day.day(), day.year())
}

/// Cedulas are shown with the Venezuelan nationality prefix.
pub fn cedula(cedula: &str) -> String {
    format!("V- {cedula}")
}

pub fn export_file_name(day: NaiveDate) -> String {
    format!("asistencia_{}.pdf", day.format("%Y-%m-%d"))
}
