//! Persistence seam for employees and their attendance.
//!
//! Handlers only see [`AttendanceStore`]; production wires in [`MySqlStore`],
//! tests use the in-memory store.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;

use crate::model::attendance::{AttendanceRecord, AttendanceRow, CheckIn};
use crate::model::employee::Employee;

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A unique key rejected the write.
    #[display(fmt = "duplicate entry")]
    Duplicate,

    #[display(fmt = "referential integrity violation: {}", _0)]
    Integrity(String),

    #[display(fmt = "{}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::Integrity(db_err.message().to_string());
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_employee(&self, cedula: &str) -> StoreResult<Option<Employee>>;

    /// All employees by name; `search` narrows to a case-insensitive
    /// substring of name, cedula or department.
    async fn list_employees(&self, search: Option<&str>) -> StoreResult<Vec<Employee>>;

    /// Fails with [`StoreError::Duplicate`] when the cedula is taken.
    async fn create_employee(&self, employee: &Employee) -> StoreResult<()>;

    /// Returns `false` when no employee has that cedula.
    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool>;

    /// Removes the employee and its attendance history atomically.
    /// `None` when the employee does not exist, otherwise the number of
    /// attendance rows removed with it.
    async fn delete_employee(&self, cedula: &str) -> StoreResult<Option<u64>>;

    /// Creates the employee if unknown, then opens the record for `now`'s
    /// date. A second check-in on the same date is [`StoreError::Duplicate`].
    async fn check_in(&self, entry: &CheckIn, title: &str, now: NaiveDateTime)
    -> StoreResult<AttendanceRecord>;

    /// Sets the check-out time, overwriting any previous one.
    async fn check_out(&self, id: u64, now: NaiveDateTime) -> StoreResult<Option<AttendanceRecord>>;

    /// Records of `day`, newest check-in first.
    async fn list_day(&self, day: NaiveDate, search: Option<&str>) -> StoreResult<Vec<AttendanceRow>>;

    async fn clear_day(&self, day: NaiveDate) -> StoreResult<u64>;

    /// Reads and deletes the records of `day` in one step.
    async fn drain_day(&self, day: NaiveDate) -> StoreResult<Vec<AttendanceRow>>;
}
