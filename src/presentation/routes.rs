use crate::presentation::auth::{current_session, login, logout, register};
use crate::presentation::handlers::{
    ApiError, create_appointment, create_financing, get_vehicle, health_check, list_vehicles,
    profile, quote_financing,
};
use actix_web::web;

/// Mounts every route. Shared by the binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Solicitud inválida: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|_err, _req| {
        ApiError::NotFound("Auto no encontrado".to_string()).into()
    }))
    .route("/health", web::get().to(health_check))
    .service(
        web::scope("/api")
            .route("/registro", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/sesion", web::get().to(current_session))
            .route("/autos", web::get().to(list_vehicles))
            .route("/auto/{id}", web::get().to(get_vehicle))
            .route("/citas", web::post().to(create_appointment))
            .route("/financiamientos", web::post().to(create_financing))
            .route("/financiamientos/cotizacion", web::post().to(quote_financing))
            .route("/perfil", web::get().to(profile)),
    );
}
