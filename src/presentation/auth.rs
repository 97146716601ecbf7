use crate::domain::user::{CreateUser, LoginRequest, SessionUser};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::CurrentUser;
use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};

pub const SESSION_COOKIE: &str = "automax_sid";

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub usuario: SessionUser,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub usuario: Option<SessionUser>,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .max_age(time::Duration::seconds(state.session_ttl.num_seconds()))
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let session = state
        .auth_service
        .register(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = session.user.id, "User registered and logged in");
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state, session.token))
        .json(AuthResponse {
            success: true,
            usuario: session.user,
        }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let session = state.auth_service.login(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to login");
        ApiError::from(e)
    })?;

    info!(user_id = session.user.id, "Login successful");
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state, session.token))
        .json(AuthResponse {
            success: true,
            usuario: session.user,
        }))
}

/// Always succeeds for the client; the cookie is cleared either way.
#[instrument(skip_all)]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
        info!("Session closed");
    }
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(LogoutResponse { success: true }))
}

#[instrument(skip_all)]
pub async fn current_session(current: Option<CurrentUser>) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        usuario: current.map(|c| c.user),
    })
}
