use crate::domain::error::DomainError;
use crate::domain::financing::{ANNUAL_INTEREST_RATE, amortize};
use crate::domain::models::{
    Appointment, CreateAppointment, CreateFinancing, FinancingQuote, FinancingRequest,
    NewFinancingRequest, Profile, QuoteRequest, Vehicle,
};
use crate::domain::repository::{AppointmentRepository, FinancingRepository, VehicleRepository};
use crate::domain::user::SessionUser;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct DealershipService<R>
where
    R: VehicleRepository + AppointmentRepository + FinancingRepository,
{
    repository: Arc<R>,
}

impl<R> DealershipService<R>
where
    R: VehicleRepository + AppointmentRepository + FinancingRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.repository.list_available_vehicles().await
    }

    /// Catalog detail; unlisted vehicles are reported as missing.
    pub async fn get_vehicle(&self, id: i64) -> Result<Vehicle> {
        self.repository
            .find_vehicle_by_id(id)
            .await?
            .filter(|vehicle| vehicle.available)
            .ok_or_else(|| DomainError::NotFound("Auto no encontrado".to_string()).into())
    }

    async fn require_vehicle(&self, id: i64) -> Result<Vehicle> {
        self.repository.find_vehicle_by_id(id).await?.ok_or_else(|| {
            warn!(vehicle_id = id, "Referenced vehicle does not exist");
            DomainError::NotFound("Auto no encontrado".to_string()).into()
        })
    }

    #[instrument(skip(self, user, req), fields(user_id = user.id, vehicle_id = ?req.vehicle_id))]
    pub async fn book_appointment(
        &self,
        user: &SessionUser,
        req: CreateAppointment,
    ) -> Result<Appointment> {
        if let Some(vehicle_id) = req.vehicle_id {
            self.require_vehicle(vehicle_id).await?;
        }
        let new = req.into_new(user)?;

        let id = self.repository.create_appointment(new).await?;
        let appointment = self
            .repository
            .find_appointment_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("Appointment {id} missing after insert")))?;

        info!(appointment_id = id, "Appointment booked");
        Ok(appointment)
    }

    /// Prices the loan for a catalog vehicle without persisting anything.
    #[instrument(skip(self))]
    pub async fn quote_financing(&self, req: QuoteRequest) -> Result<FinancingQuote> {
        let vehicle = self.require_vehicle(req.vehicle_id).await?;
        let quote = amortize(vehicle.price, req.down_payment, req.term_months)?;
        debug!(
            principal = quote.principal,
            monthly_payment = quote.monthly_payment,
            "Financing quoted"
        );

        Ok(FinancingQuote {
            vehicle_id: vehicle.id,
            price: vehicle.price,
            down_payment: req.down_payment,
            term_months: req.term_months,
            annual_rate: ANNUAL_INTEREST_RATE,
            principal: quote.principal,
            monthly_payment: quote.monthly_payment,
        })
    }

    /// Computes the amortization terms once and stores them with the request.
    #[instrument(skip(self, user, req), fields(user_id = user.id, vehicle_id = req.vehicle_id))]
    pub async fn submit_financing(
        &self,
        user: &SessionUser,
        req: CreateFinancing,
    ) -> Result<FinancingRequest> {
        req.validate_applicant()?;
        let quote = self.quote_financing(req.quote_request()).await?;

        let id = self
            .repository
            .create_financing_request(NewFinancingRequest {
                user_id: user.id,
                vehicle_id: quote.vehicle_id,
                down_payment: quote.down_payment,
                term_months: quote.term_months,
                monthly_payment: quote.monthly_payment,
                principal: quote.principal,
                occupation: req.occupation,
                income: req.income,
                tenure: req.tenure,
                created_at: Utc::now(),
            })
            .await?;

        let request = self
            .repository
            .find_financing_request_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("Financing request {id} missing after insert")))?;

        info!(
            financing_id = id,
            monthly_payment = request.monthly_payment,
            "Financing request submitted"
        );
        Ok(request)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn profile(&self, user: &SessionUser) -> Result<Profile> {
        let appointments = self.repository.list_appointments_for_user(user.id).await?;
        let financing_requests = self
            .repository
            .list_financing_requests_for_user(user.id)
            .await?;

        debug!(
            appointments = appointments.len(),
            financing_requests = financing_requests.len(),
            "Profile assembled"
        );
        Ok(Profile {
            user: user.clone(),
            appointments,
            financing_requests,
        })
    }
}
