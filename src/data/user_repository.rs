use crate::data::sqlite::SqliteStore;
use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument, trace, warn};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, created_at";

#[async_trait]
impl UserRepository for SqliteStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        trace!("Inserting user row");
        let result = sqlx::query(
            "INSERT INTO users (name, email, phone, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .execute(self.pool())
        .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                warn!(email = %user.email, "Email already registered");
                return Err(DomainError::Conflict("El email ya está registrado".to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };

        debug!(user_id = id, "User row inserted");
        self.find_user_by_id(id).await?.ok_or_else(|| {
            DomainError::Internal(format!("User {id} missing after insert")).into()
        })
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        trace!(found = user.is_some(), "Looked up user by email");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        trace!(found = user.is_some(), "Looked up user by id");
        Ok(user)
    }
}
