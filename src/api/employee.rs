use crate::{
    api::{SearchQuery, cargo, cedula, departamento, nombre},
    auth::auth::AuthUser,
    config::Config,
    error::ApiError,
    model::employee::{DEFAULT_TITLE, Employee},
    store::{AttendanceStore, StoreError},
    utils::filter::search_term,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "12345678")]
    pub cedula: String,
    #[schema(example = "Ana Pérez")]
    pub nombre: String,
    #[schema(example = "Auditoria Interna")]
    pub departamento: String,
    /// Defaults to "Empleado" when blank
    #[schema(example = "Analista", nullable = true)]
    pub cargo: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateEmployee {
    #[schema(example = "Ana Pérez")]
    pub nombre: String,
    #[schema(example = "Gerencia General")]
    pub departamento: String,
    #[schema(example = "Coordinadora", nullable = true)]
    pub cargo: Option<String>,
}

/// Get Employee by cedula
#[utoipa::path(
    get,
    path = "/empleado/{cedula}",
    params(
        ("cedula" = String, Path, description = "Employee cedula")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Empleado no encontrado"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    store: web::Data<dyn AttendanceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let cedula = path.into_inner();

    match store.find_employee(cedula.trim()).await? {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Err(ApiError::NotFound("Empleado no encontrado".to_string())),
    }
}

/// List employees ordered by name
#[utoipa::path(
    get,
    path = "/empleados",
    params(SearchQuery),
    responses(
        (status = 200, description = "Employees ordered by name", body = [Employee])
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    store: web::Data<dyn AttendanceStore>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let employees = store
        .list_employees(search_term(query.q.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/empleado",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created successfully", body = Object, example = json!({
            "message": "Empleado creado exitosamente"
        })),
        (status = 400, description = "Invalid payload or cedula already registered", body = Object, example = json!({
            "error": "La cédula ya está registrada"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee = Employee {
        cedula: cedula(&payload.cedula)?,
        nombre: nombre(&payload.nombre)?,
        departamento: departamento(&config, &payload.departamento)?,
        cargo: Some(cargo(payload.cargo.as_deref())?.unwrap_or_else(|| DEFAULT_TITLE.to_string())),
    };

    match store.create_employee(&employee).await {
        Ok(()) => {}
        Err(StoreError::Duplicate) => {
            return Err(ApiError::Conflict("La cédula ya está registrada".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    info!(cedula = %employee.cedula, by = %auth.username, "Employee created");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Empleado creado exitosamente"
    })))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/empleado/{cedula}",
    params(
        ("cedula" = String, Path, description = "Employee cedula")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = Object, example = json!({
            "message": "Empleado actualizado"
        })),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Empleado no encontrado"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    path: web::Path<String>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee = Employee {
        cedula: cedula(&path.into_inner())?,
        nombre: nombre(&body.nombre)?,
        departamento: departamento(&config, &body.departamento)?,
        cargo: cargo(body.cargo.as_deref())?,
    };

    if !store.update_employee(&employee).await? {
        return Err(ApiError::NotFound("Empleado no encontrado".to_string()));
    }

    info!(cedula = %employee.cedula, by = %auth.username, "Employee updated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Empleado actualizado"
    })))
}

/// Delete Employee together with its attendance history
#[utoipa::path(
    delete,
    path = "/empleado/{cedula}",
    params(
        ("cedula" = String, Path, description = "Employee cedula")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Empleado eliminado correctamente",
            "asistencias_eliminadas": 3
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Empleado no encontrado"
        })),
        (status = 500, description = "Internal server error, nothing was deleted", body = Object)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let cedula = path.into_inner();

    let removed = store
        .delete_employee(cedula.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Empleado no encontrado".to_string()))?;

    info!(cedula = %cedula, attendance_removed = removed, by = %auth.username, "Employee deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Empleado eliminado correctamente",
        "asistencias_eliminadas": removed
    })))
}

#[cfg(test)]
mod tests {
    use crate::api::now;
    use crate::model::attendance::CheckIn;
    use crate::store::{AttendanceStore, memory::MemoryStore};
    use crate::test_support::{bearer, test_app, test_config};
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn new_employee(cedula: &str, nombre: &str) -> Value {
        json!({
            "cedula": cedula,
            "nombre": nombre,
            "departamento": "Gerencia General",
            "cargo": ""
        })
    }

    #[actix_web::test]
    async fn created_employee_is_retrievable() {
        let config = test_config();
        let auth = bearer(&config);
        let app = test::init_service(test_app(config, Arc::new(MemoryStore::default()))).await;

        let req = test::TestRequest::post()
            .uri("/empleado")
            .insert_header(auth.clone())
            .set_json(json!({
                "cedula": " 12345678 ",
                "nombre": "Ana Pérez",
                "departamento": "Auditoria Interna",
                "cargo": "Analista"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/empleado/12345678")
            .insert_header(auth)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "cedula": "12345678",
                "nombre": "Ana Pérez",
                "departamento": "Auditoria Interna",
                "cargo": "Analista"
            })
        );
    }

    #[actix_web::test]
    async fn blank_title_defaults_to_employee() {
        let config = test_config();
        let auth = bearer(&config);
        let store = Arc::new(MemoryStore::default());
        let app = test::init_service(test_app(config, store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/empleado")
            .insert_header(auth)
            .set_json(new_employee("111", "Luis"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let stored = store.find_employee("111").await.unwrap().unwrap();
        assert_eq!(stored.cargo.as_deref(), Some("Empleado"));
    }

    #[actix_web::test]
    async fn duplicate_cedula_is_rejected_without_changes() {
        let config = test_config();
        let auth = bearer(&config);
        let store = Arc::new(MemoryStore::default());
        let app = test::init_service(test_app(config, store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/empleado")
            .insert_header(auth.clone())
            .set_json(new_employee("111", "Luis"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/empleado")
            .insert_header(auth)
            .set_json(new_employee("111", "Otro Nombre"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "La cédula ya está registrada");

        let stored = store.find_employee("111").await.unwrap().unwrap();
        assert_eq!(stored.nombre, "Luis");
    }

    #[actix_web::test]
    async fn invalid_payloads_are_bad_requests() {
        let config = test_config();
        let auth = bearer(&config);
        let app = test::init_service(test_app(config, Arc::new(MemoryStore::default()))).await;

        for payload in [
            json!({ "cedula": "", "nombre": "Ana", "departamento": "Gerencia General" }),
            json!({ "cedula": "1", "nombre": "  ", "departamento": "Gerencia General" }),
            json!({ "cedula": "1", "nombre": "Ana", "departamento": "Marketing" }),
            json!({ "cedula": "1", "nombre": "Ana" }),
        ] {
            let req = test::TestRequest::post()
                .uri("/empleado")
                .insert_header(auth.clone())
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn list_is_sorted_by_name_and_filterable() {
        let config = test_config();
        let auth = bearer(&config);
        let app = test::init_service(test_app(config, Arc::new(MemoryStore::default()))).await;

        for (cedula, nombre) in [("3", "Carla"), ("1", "Ana"), ("2", "Bruno")] {
            let req = test::TestRequest::post()
                .uri("/empleado")
                .insert_header(auth.clone())
                .set_json(new_employee(cedula, nombre))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/empleados")
            .insert_header(auth.clone())
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let names: Vec<&str> = body.iter().map(|e| e["nombre"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);

        let req = test::TestRequest::get()
            .uri("/empleados?q=BRU")
            .insert_header(auth)
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["cedula"], "2");
    }

    #[actix_web::test]
    async fn update_overwrites_known_and_rejects_unknown() {
        let config = test_config();
        let auth = bearer(&config);
        let store = Arc::new(MemoryStore::default());
        let app = test::init_service(test_app(config, store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/empleado")
            .insert_header(auth.clone())
            .set_json(new_employee("111", "Luis"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let update = json!({ "nombre": "Luis Gómez", "departamento": "Visitante", "cargo": " " });
        let req = test::TestRequest::put()
            .uri("/empleado/111")
            .insert_header(auth.clone())
            .set_json(&update)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let stored = store.find_employee("111").await.unwrap().unwrap();
        assert_eq!(stored.nombre, "Luis Gómez");
        assert_eq!(stored.departamento, "Visitante");
        assert_eq!(stored.cargo, None);

        let req = test::TestRequest::put()
            .uri("/empleado/999")
            .insert_header(auth)
            .set_json(&update)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        assert!(store.find_employee("999").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn delete_removes_history_then_employee() {
        let config = test_config();
        let auth = bearer(&config);
        let store = Arc::new(MemoryStore::default());
        let entry = CheckIn {
            cedula: "111".into(),
            nombre: "Luis".into(),
            departamento: "Gerencia General".into(),
        };
        store.check_in(&entry, "Visitante / Nuevo", now()).await.unwrap();
        store
            .create_employee(&crate::model::employee::Employee {
                cedula: "222".into(),
                nombre: "Marta".into(),
                departamento: "Gerencia General".into(),
                cargo: None,
            })
            .await
            .unwrap();
        let app = test::init_service(test_app(config, store.clone())).await;

        let req = test::TestRequest::delete()
            .uri("/empleado/111")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["asistencias_eliminadas"], 1);
        assert_eq!(store.record_count(), 0);
        assert!(store.find_employee("111").await.unwrap().is_none());

        let req = test::TestRequest::delete()
            .uri("/empleado/222")
            .insert_header(auth.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["asistencias_eliminadas"], 0);
        assert!(store.find_employee("222").await.unwrap().is_none());

        let req = test::TestRequest::delete()
            .uri("/empleado/222")
            .insert_header(auth)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_employee_is_not_found() {
        let config = test_config();
        let auth = bearer(&config);
        let app = test::init_service(test_app(config, Arc::new(MemoryStore::default()))).await;

        let req = test::TestRequest::get()
            .uri("/empleado/000")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Empleado no encontrado");
    }

    #[actix_web::test]
    async fn endpoints_require_a_token() {
        let app = test::init_service(test_app(test_config(), Arc::new(MemoryStore::default()))).await;

        let req = test::TestRequest::get().uri("/empleados").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete().uri("/empleado/111").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
