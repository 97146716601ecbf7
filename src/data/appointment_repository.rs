use crate::data::sqlite::SqliteStore;
use crate::domain::models::{Appointment, NewAppointment};
use crate::domain::repository::AppointmentRepository;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

// LEFT JOIN: appointments may be booked without a vehicle
const APPOINTMENT_SELECT: &str = r#"
    SELECT a.id, a.user_id, a.vehicle_id, a.date, a.time, a.message, a.status, a.created_at,
           v.brand, v.model, v.year, v.price, v.image
    FROM appointments a
    LEFT JOIN vehicles v ON a.vehicle_id = v.id
"#;

#[async_trait]
impl AppointmentRepository for SqliteStore {
    #[instrument(skip(self, appointment), fields(user_id = appointment.user_id))]
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<i64> {
        let done = sqlx::query(
            r#"
            INSERT INTO appointments (user_id, vehicle_id, date, time, message, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(appointment.user_id)
        .bind(appointment.vehicle_id)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(&appointment.message)
        .bind(appointment.created_at)
        .execute(self.pool())
        .await?;
        let id = done.last_insert_rowid();
        debug!(appointment_id = id, "Appointment row inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_appointment_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>(&format!("{APPOINTMENT_SELECT} WHERE a.id = ?"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn list_appointments_for_user(&self, user_id: i64) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "{APPOINTMENT_SELECT} WHERE a.user_id = ? ORDER BY a.created_at DESC, a.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        debug!(count = appointments.len(), "Listed appointments");
        Ok(appointments)
    }
}
