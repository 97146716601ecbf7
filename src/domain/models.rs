use crate::domain::error::DomainError;
use crate::domain::user::SessionUser;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_APPOINTMENT_STATUS: &str = "Pendiente";
pub const DEFAULT_FINANCING_STATUS: &str = "Solicitud enviada";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "año")]
    pub year: i64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "tipo")]
    pub body_type: String,
    #[serde(rename = "combustible")]
    pub fuel: String,
    #[serde(rename = "transmision")]
    pub transmission: String,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "disponible")]
    pub available: bool,
}

/// Vehicle columns joined onto appointments and financing requests.
/// All optional: an appointment may not reference a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleSummary {
    #[serde(rename = "marca")]
    pub brand: Option<String>,
    #[serde(rename = "modelo")]
    pub model: Option<String>,
    #[serde(rename = "año")]
    pub year: Option<i64>,
    #[serde(rename = "precio")]
    pub price: Option<f64>,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "auto_id")]
    pub vehicle_id: Option<i64>,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub vehicle: VehicleSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancingRequest {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "auto_id")]
    pub vehicle_id: i64,
    #[serde(rename = "enganche")]
    pub down_payment: f64,
    #[serde(rename = "mensualidades")]
    pub term_months: i64,
    #[serde(rename = "pago_mensual")]
    pub monthly_payment: f64,
    #[serde(rename = "monto_financiar")]
    pub principal: f64,
    #[serde(rename = "ocupacion")]
    pub occupation: Option<String>,
    #[serde(rename = "ingresos")]
    pub income: Option<f64>,
    #[serde(rename = "antiguedad")]
    pub tenure: Option<String>,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub vehicle: VehicleSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAppointment {
    #[serde(rename = "autoId", default)]
    pub vehicle_id: Option<i64>,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
}

impl CreateAppointment {
    /// Checks the date (`YYYY-MM-DD`) and time (`HH:MM[:SS]`) and builds the
    /// row to insert for `user`.
    pub fn into_new(self, user: &SessionUser) -> Result<NewAppointment, DomainError> {
        let date = self.date.trim();
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(DomainError::Validation(
                "La fecha debe tener el formato AAAA-MM-DD".to_string(),
            ));
        }

        let time = self.time.trim();
        let time_ok = NaiveTime::parse_from_str(time, "%H:%M").is_ok()
            || NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok();
        if !time_ok {
            return Err(DomainError::Validation(
                "La hora debe tener el formato HH:MM".to_string(),
            ));
        }

        Ok(NewAppointment {
            user_id: user.id,
            vehicle_id: self.vehicle_id,
            date: date.to_string(),
            time: time.to_string(),
            message: self.message.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: i64,
    pub vehicle_id: Option<i64>,
    pub date: String,
    pub time: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(rename = "autoId")]
    pub vehicle_id: i64,
    #[serde(rename = "enganche")]
    pub down_payment: f64,
    #[serde(rename = "mensualidades")]
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingQuote {
    #[serde(rename = "auto_id")]
    pub vehicle_id: i64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "enganche")]
    pub down_payment: f64,
    #[serde(rename = "mensualidades")]
    pub term_months: u32,
    #[serde(rename = "tasa_anual")]
    pub annual_rate: f64,
    #[serde(rename = "monto_financiar")]
    pub principal: f64,
    #[serde(rename = "pago_mensual")]
    pub monthly_payment: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFinancing {
    #[serde(rename = "autoId")]
    pub vehicle_id: i64,
    #[serde(rename = "enganche")]
    pub down_payment: f64,
    #[serde(rename = "mensualidades")]
    pub term_months: u32,
    #[serde(rename = "ocupacion", default)]
    pub occupation: Option<String>,
    #[serde(rename = "ingresos", default)]
    pub income: Option<f64>,
    #[serde(rename = "antiguedad", default)]
    pub tenure: Option<String>,
}

impl CreateFinancing {
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            vehicle_id: self.vehicle_id,
            down_payment: self.down_payment,
            term_months: self.term_months,
        }
    }

    pub fn validate_applicant(&self) -> Result<(), DomainError> {
        match self.income {
            Some(income) if !income.is_finite() || income < 0.0 => Err(DomainError::Validation(
                "Los ingresos no pueden ser negativos".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Insert payload with the amortization terms already computed.
#[derive(Debug, Clone)]
pub struct NewFinancingRequest {
    pub user_id: i64,
    pub vehicle_id: i64,
    pub down_payment: f64,
    pub term_months: u32,
    pub monthly_payment: f64,
    pub principal: f64,
    pub occupation: Option<String>,
    pub income: Option<f64>,
    pub tenure: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "usuario")]
    pub user: SessionUser,
    #[serde(rename = "citas")]
    pub appointments: Vec<Appointment>,
    #[serde(rename = "financiamientos")]
    pub financing_requests: Vec<FinancingRequest>,
}
