use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or_default(),
        None => {
            let resp =
                HttpResponse::Unauthorized().json(json!({"error": "Sesión no iniciada"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "El encabezado Authorization debe comenzar con Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected token");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Sesión inválida o expirada", "details": e}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    // Tokens are only issued to the configured administrator.
    if claims.sub != config.admin_username {
        let resp = HttpResponse::Unauthorized().json(json!({"error": "Usuario desconocido"}));
        return Ok(req.into_response(resp.map_into_boxed_body()));
    }

    req.extensions_mut().insert(AuthUser {
        username: claims.sub,
    });

    next.call(req).await
}
