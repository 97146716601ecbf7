use crate::domain::error::DomainError;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::user::{CreateUser, LoginRequest, NewUser, SessionUser};
use crate::infrastructure::security::{hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

/// Result of a successful register or login.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub token: String,
    pub user: SessionUser,
}

pub struct AuthService<R: UserRepository, S: SessionStore> {
    user_repository: Arc<R>,
    sessions: Arc<S>,
}

impl<R: UserRepository, S: SessionStore> AuthService<R, S> {
    pub fn new(user_repository: Arc<R>, sessions: Arc<S>) -> Self {
        Self {
            user_repository,
            sessions,
        }
    }

    /// Creates the account and logs the new user in.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<EstablishedSession> {
        trace!("Starting user registration");
        let req = req.normalized()?;

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::Conflict("El email ya está registrado".to_string()).into());
        }

        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {e}"))
            })?;

        // The unique index still guards against a concurrent registration
        let user = self
            .user_repository
            .create_user(NewUser {
                name: req.name,
                email: req.email,
                phone: req.phone,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User registered successfully");
        self.establish(user.into()).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<EstablishedSession> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::InvalidCredentials
            })?;

        let password = req.password;
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| DomainError::Internal(format!("Password check task failed: {e}")))?
                .map_err(|e| {
                    error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                    DomainError::Internal(format!("Failed to verify password: {e}"))
                })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        info!(user_id = user.id, email = %user.email, "Login successful");
        self.establish(user.into()).await
    }

    /// Ends the session behind `token`. Unknown tokens are not an error.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<()> {
        let removed = self.sessions.destroy_session(token).await?;
        debug!(removed, "Logout processed");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &str) -> Result<Option<SessionUser>> {
        self.sessions.find_session(token).await
    }

    async fn establish(&self, user: SessionUser) -> Result<EstablishedSession> {
        let token = self.sessions.create_session(user.clone()).await?;
        debug!(user_id = user.id, "Session established");
        Ok(EstablishedSession { token, user })
    }
}
