use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use super::{AttendanceStore, StoreResult};
use crate::model::attendance::{AttendanceRecord, AttendanceRow, CheckIn};
use crate::model::employee::Employee;
use crate::utils::filter::like_pattern;

const RECORD_COLUMNS: &str = "id, cedula_empleado, fecha, hora_entrada, hora_salida";

const DAY_ROWS_SQL: &str = r#"
    SELECT a.id, a.hora_entrada, a.hora_salida, e.nombre, e.cedula, e.departamento
    FROM attendance_records a
    JOIN employees e ON a.cedula_empleado = e.cedula
    WHERE a.fecha = "#;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn day_rows_query(day: NaiveDate, search: Option<&str>) -> QueryBuilder<'static, MySql> {
        let mut query = QueryBuilder::new(DAY_ROWS_SQL);
        query.push_bind(day);

        if let Some(term) = search {
            let like = like_pattern(term);
            query
                .push(" AND (e.nombre LIKE ")
                .push_bind(like.clone())
                .push(" OR e.cedula LIKE ")
                .push_bind(like.clone())
                .push(" OR e.departamento LIKE ")
                .push_bind(like)
                .push(")");
        }

        query.push(" ORDER BY a.hora_entrada DESC, a.id DESC");
        query
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find_employee(&self, cedula: &str) -> StoreResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT cedula, nombre, departamento, cargo FROM employees WHERE cedula = ?",
        )
        .bind(cedula)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn list_employees(&self, search: Option<&str>) -> StoreResult<Vec<Employee>> {
        let mut query =
            QueryBuilder::<MySql>::new("SELECT cedula, nombre, departamento, cargo FROM employees");

        if let Some(term) = search {
            let like = like_pattern(term);
            query
                .push(" WHERE nombre LIKE ")
                .push_bind(like.clone())
                .push(" OR cedula LIKE ")
                .push_bind(like.clone())
                .push(" OR departamento LIKE ")
                .push_bind(like);
        }
        query.push(" ORDER BY nombre ASC");

        debug!(sql = %query.sql(), "Listing employees");

        let employees = query
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    async fn create_employee(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (cedula, nombre, departamento, cargo)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&employee.cedula)
        .bind(&employee.nombre)
        .bind(&employee.departamento)
        .bind(&employee.cargo)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET nombre = ?, departamento = ?, cargo = ?
            WHERE cedula = ?
            "#,
        )
        .bind(&employee.nombre)
        .bind(&employee.departamento)
        .bind(&employee.cargo)
        .bind(&employee.cedula)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // MySQL reports changed rows, so an update that rewrites identical
        // values also lands here.
        let matching = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE cedula = ?")
            .bind(&employee.cedula)
            .fetch_one(&self.pool)
            .await?;

        Ok(matching > 0)
    }

    async fn delete_employee(&self, cedula: &str) -> StoreResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let history = sqlx::query("DELETE FROM attendance_records WHERE cedula_empleado = ?")
            .bind(cedula)
            .execute(&mut *tx)
            .await?;

        let employee = sqlx::query("DELETE FROM employees WHERE cedula = ?")
            .bind(cedula)
            .execute(&mut *tx)
            .await?;

        if employee.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(history.rows_affected()))
    }

    async fn check_in(
        &self,
        entry: &CheckIn,
        title: &str,
        now: NaiveDateTime,
    ) -> StoreResult<AttendanceRecord> {
        let mut tx = self.pool.begin().await?;

        // Known employees keep their stored name and department.
        sqlx::query(
            r#"
            INSERT INTO employees (cedula, nombre, departamento, cargo)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE cedula = cedula
            "#,
        )
        .bind(&entry.cedula)
        .bind(&entry.nombre)
        .bind(&entry.departamento)
        .bind(title)
        .execute(&mut *tx)
        .await?;

        // uq_attendance_employee_day turns a second check-in into Duplicate.
        let inserted = sqlx::query(
            r#"
            INSERT INTO attendance_records (cedula_empleado, fecha, hora_entrada)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&entry.cedula)
        .bind(now.date())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM attendance_records WHERE id = ?"
        ))
        .bind(inserted.last_insert_id())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn check_out(&self, id: u64, now: NaiveDateTime) -> StoreResult<Option<AttendanceRecord>> {
        sqlx::query("UPDATE attendance_records SET hora_salida = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM attendance_records WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_day(&self, day: NaiveDate, search: Option<&str>) -> StoreResult<Vec<AttendanceRow>> {
        let mut query = Self::day_rows_query(day, search);
        debug!(sql = %query.sql(), %day, "Listing attendance");

        let rows = query
            .build_query_as::<AttendanceRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn clear_day(&self, day: NaiveDate) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE fecha = ?")
            .bind(day)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn drain_day(&self, day: NaiveDate) -> StoreResult<Vec<AttendanceRow>> {
        let mut tx = self.pool.begin().await?;

        let mut query = Self::day_rows_query(day, None);
        query.push(" FOR UPDATE");

        let rows = query
            .build_query_as::<AttendanceRow>()
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM attendance_records WHERE fecha = ?")
            .bind(day)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rows)
    }
}
