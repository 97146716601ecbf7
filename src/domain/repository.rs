use crate::domain::models::{
    Appointment, FinancingRequest, NewAppointment, NewFinancingRequest, Vehicle,
};
use crate::domain::user::{NewUser, SessionUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list_available_vehicles(&self) -> Result<Vec<Vehicle>>;
    async fn find_vehicle_by_id(&self, id: i64) -> Result<Option<Vehicle>>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<i64>;
    async fn find_appointment_by_id(&self, id: i64) -> Result<Option<Appointment>>;
    /// Most recent first.
    async fn list_appointments_for_user(&self, user_id: i64) -> Result<Vec<Appointment>>;
}

#[async_trait]
pub trait FinancingRepository: Send + Sync {
    async fn create_financing_request(&self, request: NewFinancingRequest) -> Result<i64>;
    async fn find_financing_request_by_id(&self, id: i64) -> Result<Option<FinancingRequest>>;
    /// Most recent first.
    async fn list_financing_requests_for_user(&self, user_id: i64)
    -> Result<Vec<FinancingRequest>>;
}

/// Server-side session state keyed by an opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `user` under a fresh token and returns the token.
    async fn create_session(&self, user: SessionUser) -> Result<String>;
    /// Returns `None` for unknown or expired tokens.
    async fn find_session(&self, token: &str) -> Result<Option<SessionUser>>;
    /// Returns whether a live session was removed.
    async fn destroy_session(&self, token: &str) -> Result<bool>;
}
