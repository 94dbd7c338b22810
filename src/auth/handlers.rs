use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token, password::verify_password},
    config::Config,
    error::ApiError,
    models::{LoginReqDto, LoginResponse},
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

/// Exchange the administrator credential for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Usuario o contraseña incorrectos"
        })),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::BadRequest(
            "Usuario y contraseña son obligatorios".to_string(),
        ));
    }

    debug!("Verifying password");

    // Always verify; response time must not reveal whether the username matched.
    let password_ok = verify_password(&user.password, &config.admin_password_hash).is_ok();
    if user.username.trim() != config.admin_username || !password_ok {
        info!("Invalid credentials");
        return Err(ApiError::Unauthorized(
            "Usuario o contraseña incorrectos".to_string(),
        ));
    }

    let access_token = generate_access_token(
        &config.admin_username,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal("No se pudo iniciar sesión".to_string())
    })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.access_token_ttl,
    }))
}

/// Report whether the presented token is still valid
#[utoipa::path(
    get,
    path = "/auth/sesion",
    responses(
        (status = 200, description = "Session active", body = Object, example = json!({
            "usuario": "admin"
        })),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn session(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "usuario": auth.username }))
}
