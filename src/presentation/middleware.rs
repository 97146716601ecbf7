use crate::domain::user::SessionUser;
use crate::presentation::auth::SESSION_COOKIE;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web,
};
use std::{
    future::{Future, Ready, ready},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
    time::Instant,
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Tags every request with an `x-request-id`, times it, and logs the outcome.
/// Handler events are recorded inside a `request` span carrying the same id.
pub struct RequestLogMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestLogMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLogMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let method = req.method().clone();
        let path = req.path().to_string();

        let span = info_span!("request", %request_id, %method, %path);
        let fut = span.in_scope(|| service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                let duration_ms = start.elapsed().as_millis();
                let status = res.status();

                let headers = res.headers_mut();
                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    headers.insert(HeaderName::from_static("x-request-id"), value);
                }
                if let Ok(value) = HeaderValue::from_str(&format!("{duration_ms}ms")) {
                    headers.insert(HeaderName::from_static("x-response-time"), value);
                }

                if status.is_server_error() {
                    warn!(status = status.as_u16(), duration_ms, "Request failed");
                } else {
                    info!(status = status.as_u16(), duration_ms, "Request processed");
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Extractor for handlers that require a logged-in user.
/// Rejects with `401` when the session cookie is missing, unknown, or expired.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let state = state
                .ok_or_else(|| ApiError::Internal("AppState is not registered".to_string()))?;
            let token = token.ok_or_else(ApiError::login_required)?;
            let user = state
                .auth_service
                .current_user(&token)
                .await?
                .ok_or_else(ApiError::login_required)?;
            Ok(CurrentUser { user })
        })
    }
}
