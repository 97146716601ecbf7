use crate::data::sqlite::SqliteStore;
use crate::domain::models::{FinancingRequest, NewFinancingRequest};
use crate::domain::repository::FinancingRepository;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

const FINANCING_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.vehicle_id, f.down_payment, f.term_months, f.monthly_payment,
           f.principal, f.occupation, f.income, f.tenure, f.status, f.created_at,
           v.brand, v.model, v.year, v.price, v.image
    FROM financing_requests f
    JOIN vehicles v ON f.vehicle_id = v.id
"#;

#[async_trait]
impl FinancingRepository for SqliteStore {
    #[instrument(skip(self, request), fields(user_id = request.user_id, vehicle_id = request.vehicle_id))]
    async fn create_financing_request(&self, request: NewFinancingRequest) -> Result<i64> {
        let done = sqlx::query(
            r#"
            INSERT INTO financing_requests (
                user_id, vehicle_id, down_payment, term_months, monthly_payment,
                principal, occupation, income, tenure, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.user_id)
        .bind(request.vehicle_id)
        .bind(request.down_payment)
        .bind(request.term_months)
        .bind(request.monthly_payment)
        .bind(request.principal)
        .bind(&request.occupation)
        .bind(request.income)
        .bind(&request.tenure)
        .bind(request.created_at)
        .execute(self.pool())
        .await?;
        let id = done.last_insert_rowid();
        debug!(financing_id = id, "Financing request row inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_financing_request_by_id(&self, id: i64) -> Result<Option<FinancingRequest>> {
        let request =
            sqlx::query_as::<_, FinancingRequest>(&format!("{FINANCING_SELECT} WHERE f.id = ?"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn list_financing_requests_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<FinancingRequest>> {
        let requests = sqlx::query_as::<_, FinancingRequest>(&format!(
            "{FINANCING_SELECT} WHERE f.user_id = ? ORDER BY f.created_at DESC, f.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        debug!(count = requests.len(), "Listed financing requests");
        Ok(requests)
    }
}
