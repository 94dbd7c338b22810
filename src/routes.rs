use crate::{
    api::{attendance, employee, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, get, middleware::from_fn, web};
use serde_json::json;

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "servicio": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Per-IP limiter, replenishing `requests_per_min` tokens over a minute
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Solicitud inválida: {err}")).into()
    }));

    cfg.service(index);

    // Public login; the session probe needs a token
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/sesion")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(handlers::session)),
            ),
    );

    // Protected routes. The token check sits on each resource rather than the
    // scope: with the default empty prefix the scope matches every path, and
    // unknown paths must still answer 404.
    let protected = |path: &str| web::resource(path).wrap(from_fn(auth_middleware));

    cfg.service(
        web::scope(&config.api_prefix)
            // /empleado
            .service(protected("/empleado").route(web::post().to(employee::create_employee)))
            // /empleado/{cedula}
            .service(
                protected("/empleado/{cedula}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            )
            .service(protected("/empleados").route(web::get().to(employee::list_employees)))
            // attendance
            .service(protected("/asistencia").route(web::post().to(attendance::check_in)))
            .service(protected("/salida/{id}").route(web::put().to(attendance::check_out)))
            .service(protected("/registros-hoy").route(web::get().to(attendance::list_today)))
            .service(protected("/vaciar-hoy").route(web::delete().to(attendance::clear_today)))
            // presentation
            .service(protected("/departamentos").route(web::get().to(report::departments)))
            .service(protected("/panel").route(web::get().to(report::dashboard)))
            .service(protected("/exportar").route(web::get().to(report::export)))
            .service(
                protected("/exportar-y-vaciar").route(web::post().to(report::export_and_clear)),
            ),
    );
}
