use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, AttendanceRow, CheckIn};
use crate::model::employee::Employee;
use crate::utils::filter::{fold, matches_any};

/// Keeps the MySQL store's contract (unique keys, atomic delete) in a mutex.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    employees: BTreeMap<String, Employee>,
    records: Vec<AttendanceRecord>,
    next_id: u64,
}

impl Inner {
    fn rows_for(&self, day: NaiveDate, search: Option<&str>) -> Vec<AttendanceRow> {
        let mut rows: Vec<AttendanceRow> = self
            .records
            .iter()
            .filter(|r| r.fecha == day)
            .filter_map(|r| {
                let e = self.employees.get(&r.cedula_empleado)?;
                Some(AttendanceRow {
                    id: r.id,
                    hora_entrada: r.hora_entrada,
                    hora_salida: r.hora_salida,
                    nombre: e.nombre.clone(),
                    cedula: e.cedula.clone(),
                    departamento: e.departamento.clone(),
                })
            })
            .filter(|row| match search {
                Some(term) => matches_any(term, &[row.nombre.as_str(), row.cedula.as_str(), row.departamento.as_str()]),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.hora_entrada
                .cmp(&a.hora_entrada)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }

    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_employee(&self, cedula: &str) -> StoreResult<Option<Employee>> {
        Ok(self.lock().employees.get(cedula).cloned())
    }

    async fn list_employees(&self, search: Option<&str>) -> StoreResult<Vec<Employee>> {
        let mut employees: Vec<Employee> = self
            .lock()
            .employees
            .values()
            .filter(|e| match search {
                Some(term) => matches_any(term, &[e.nombre.as_str(), e.cedula.as_str(), e.departamento.as_str()]),
                None => true,
            })
            .cloned()
            .collect();

        employees.sort_by_cached_key(|e| (fold(&e.nombre), e.cedula.clone()));
        Ok(employees)
    }

    async fn create_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut inner = self.lock();
        if inner.employees.contains_key(&employee.cedula) {
            return Err(StoreError::Duplicate);
        }
        inner.employees.insert(employee.cedula.clone(), employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let mut inner = self.lock();
        match inner.employees.get_mut(&employee.cedula) {
            Some(stored) => {
                *stored = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_employee(&self, cedula: &str) -> StoreResult<Option<u64>> {
        let mut inner = self.lock();
        if inner.employees.remove(cedula).is_none() {
            return Ok(None);
        }

        let before = inner.records.len();
        inner.records.retain(|r| r.cedula_empleado != cedula);
        Ok(Some((before - inner.records.len()) as u64))
    }

    async fn check_in(
        &self,
        entry: &CheckIn,
        title: &str,
        now: NaiveDateTime,
    ) -> StoreResult<AttendanceRecord> {
        let mut inner = self.lock();
        let fecha = now.date();

        if inner
            .records
            .iter()
            .any(|r| r.cedula_empleado == entry.cedula && r.fecha == fecha)
        {
            return Err(StoreError::Duplicate);
        }

        inner
            .employees
            .entry(entry.cedula.clone())
            .or_insert_with(|| Employee {
                cedula: entry.cedula.clone(),
                nombre: entry.nombre.clone(),
                departamento: entry.departamento.clone(),
                cargo: Some(title.to_string()),
            });

        inner.next_id += 1;
        let record = AttendanceRecord {
            id: inner.next_id,
            cedula_empleado: entry.cedula.clone(),
            fecha,
            hora_entrada: now,
            hora_salida: None,
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn check_out(&self, id: u64, now: NaiveDateTime) -> StoreResult<Option<AttendanceRecord>> {
        let mut inner = self.lock();
        Ok(inner.records.iter_mut().find(|r| r.id == id).map(|r| {
            r.hora_salida = Some(now);
            r.clone()
        }))
    }

    async fn list_day(&self, day: NaiveDate, search: Option<&str>) -> StoreResult<Vec<AttendanceRow>> {
        Ok(self.lock().rows_for(day, search))
    }

    async fn clear_day(&self, day: NaiveDate) -> StoreResult<u64> {
        let mut inner = self.lock();
        let before = inner.records.len();
        inner.records.retain(|r| r.fecha != day);
        Ok((before - inner.records.len()) as u64)
    }

    async fn drain_day(&self, day: NaiveDate) -> StoreResult<Vec<AttendanceRow>> {
        let mut inner = self.lock();
        let rows = inner.rows_for(day, None);
        inner.records.retain(|r| r.fecha != day);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(cedula: &str, nombre: &str) -> Employee {
        Employee {
            cedula: cedula.into(),
            nombre: nombre.into(),
            departamento: "Gerencia General".into(),
            cargo: None,
        }
    }

    #[actix_web::test]
    async fn names_sort_and_match_ignoring_case_and_accents() {
        let store = MemoryStore::default();
        for (cedula, nombre) in [("1", "ana"), ("2", "Bruno"), ("3", "Álvaro")] {
            store.create_employee(&employee(cedula, nombre)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_employees(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.nombre)
            .collect();
        assert_eq!(names, vec!["Álvaro", "ana", "Bruno"]);

        let found = store.list_employees(Some("alvaro")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cedula, "3");
    }
}
