use crate::data::sqlite::SqliteStore;
use crate::domain::models::Vehicle;
use crate::domain::repository::VehicleRepository;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

const VEHICLE_COLUMNS: &str = "id, brand, model, year, price, body_type, fuel, transmission, \
                               image, description, available";

#[async_trait]
impl VehicleRepository for SqliteStore {
    #[instrument(skip(self))]
    async fn list_available_vehicles(&self) -> Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE available = 1 ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await?;
        debug!(count = vehicles.len(), "Listed available vehicles");
        Ok(vehicles)
    }

    #[instrument(skip(self))]
    async fn find_vehicle_by_id(&self, id: i64) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(vehicle)
    }
}
