use std::sync::Arc;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};

use crate::{
    auth::{jwt::generate_access_token, password::hash_password},
    config::{Config, DEFAULT_DEPARTMENTS},
    routes,
    store::{AttendanceStore, memory::MemoryStore},
};

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_addr: "127.0.0.1:0".into(),
        jwt_secret: "test-secret".into(),
        access_token_ttl: 3600,
        admin_username: "admin".into(),
        // Not a valid PHC string; logins against it always fail.
        admin_password_hash: "unset".into(),
        admin_password_plaintext: false,
        departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
        rate_login_per_min: 100,
        api_prefix: String::new(),
        log_dir: "logs".into(),
        log_level: tracing::Level::INFO,
    }
}

pub fn test_config_with_password(password: &str) -> Config {
    Config {
        admin_password_hash: hash_password(password).unwrap(),
        ..test_config()
    }
}

/// Authorization header carrying a fresh token for the configured admin.
pub fn bearer(config: &Config) -> (&'static str, String) {
    let token = generate_access_token(
        &config.admin_username,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

/// The production route table over an in-memory store.
pub fn test_app(
    config: Config,
    store: Arc<MemoryStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn AttendanceStore> = store;

    App::new()
        .app_data(web::Data::new(config.clone()))
        .app_data(web::Data::from(store))
        .configure(|cfg| routes::configure(cfg, config))
}
