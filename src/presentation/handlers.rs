use crate::application::auth_service::AuthService;
use crate::application::service::DealershipService;
use crate::data::memory::InMemorySessionStore;
use crate::data::sqlite::SqliteStore;
use crate::domain::error::DomainError;
use crate::domain::models::{
    Appointment, CreateAppointment, CreateFinancing, FinancingRequest, QuoteRequest,
};
use crate::presentation::middleware::CurrentUser;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub service: DealershipService<SqliteStore>,
    pub auth_service: AuthService<SqliteStore, InMemorySessionStore>,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(store: SqliteStore, sessions: InMemorySessionStore, cookie_secure: bool) -> Self {
        let store = Arc::new(store);
        let session_ttl = sessions.ttl();
        Self {
            service: DealershipService::new(store.clone()),
            auth_service: AuthService::new(store, Arc::new(sessions)),
            session_ttl,
            cookie_secure,
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error en la base de datos")]
    Database(String),
    #[error("Error interno del servidor")]
    Internal(String),
}

impl ApiError {
    pub fn login_required() -> Self {
        ApiError::Unauthorized("Debes iniciar sesión".to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            ApiError::Validation(_) => warn!(error = %message, status = %status, "Validation error"),
            ApiError::Conflict(_) => warn!(error = %message, status = %status, "Conflict"),
            ApiError::InvalidCredentials => {
                warn!(status = %status, "Invalid credentials")
            }
            ApiError::Unauthorized(_) => warn!(error = %message, status = %status, "Unauthorized"),
            ApiError::NotFound(_) => warn!(error = %message, status = %status, "Resource not found"),
            ApiError::Database(detail) => error!(error = %detail, status = %status, "Database error"),
            ApiError::Internal(detail) => error!(error = %detail, status = %status, "Internal error"),
        }

        HttpResponse::build(status).json(ErrorResponse {
            details: serde_json::json!({ "message": message }),
            error: message,
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::InvalidCredentials) => ApiError::InvalidCredentials,
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Database(format!("{err:#}")),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state))]
pub async fn list_vehicles(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let vehicles = state.service.list_vehicles().await.map_err(|e| {
        error!(error = %e, "Failed to list vehicles");
        ApiError::from(e)
    })?;
    info!(count = vehicles.len(), "Vehicles listed");
    Ok(HttpResponse::Ok().json(vehicles))
}

#[instrument(skip(state), fields(vehicle_id = %*path))]
pub async fn get_vehicle(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let vehicle_id = path.into_inner();
    let vehicle = state.service.get_vehicle(vehicle_id).await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

#[derive(Serialize)]
struct AppointmentResponse {
    success: bool,
    cita: Appointment,
}

#[instrument(skip(state, current, req), fields(user_id = current.user.id))]
pub async fn create_appointment(
    state: web::Data<AppState>,
    current: CurrentUser,
    req: web::Json<CreateAppointment>,
) -> Result<HttpResponse, ApiError> {
    info!(vehicle_id = ?req.vehicle_id, date = %req.date, "Booking appointment");
    let appointment = state
        .service
        .book_appointment(&current.user, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to book appointment");
            ApiError::from(e)
        })?;
    info!(appointment_id = appointment.id, "Appointment booked successfully");
    Ok(HttpResponse::Ok().json(AppointmentResponse {
        success: true,
        cita: appointment,
    }))
}

#[derive(Serialize)]
struct FinancingResponse {
    success: bool,
    financiamiento: FinancingRequest,
}

#[instrument(skip(state, current, req), fields(user_id = current.user.id, vehicle_id = req.vehicle_id))]
pub async fn create_financing(
    state: web::Data<AppState>,
    current: CurrentUser,
    req: web::Json<CreateFinancing>,
) -> Result<HttpResponse, ApiError> {
    info!(
        down_payment = req.down_payment,
        term_months = req.term_months,
        "Submitting financing request"
    );
    let request = state
        .service
        .submit_financing(&current.user, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to submit financing request");
            ApiError::from(e)
        })?;
    info!(
        financing_id = request.id,
        monthly_payment = request.monthly_payment,
        "Financing request created successfully"
    );
    Ok(HttpResponse::Ok().json(FinancingResponse {
        success: true,
        financiamiento: request,
    }))
}

#[instrument(skip(state))]
pub async fn quote_financing(
    state: web::Data<AppState>,
    req: web::Json<QuoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let quote = state.service.quote_financing(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(quote))
}

#[instrument(skip(state, current), fields(user_id = current.user.id))]
pub async fn profile(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.service.profile(&current.user).await.map_err(|e| {
        error!(error = %e, "Failed to load profile");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (domain, status) in cases {
            let api = ApiError::from(anyhow::Error::from(domain));
            assert_eq!(api.status_code(), status);
        }
    }

    #[test]
    fn test_foreign_errors_are_database_errors() {
        let api = ApiError::from(anyhow::anyhow!("disk I/O error"));
        assert!(matches!(api, ApiError::Database(_)));
        assert_eq!(api.to_string(), "Error en la base de datos");
    }

    #[actix_web::test]
    async fn test_error_body_carries_message() {
        let response = ApiError::NotFound("Auto no encontrado".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Auto no encontrado");
        assert_eq!(json["details"]["message"], "Auto no encontrado");
    }
}
