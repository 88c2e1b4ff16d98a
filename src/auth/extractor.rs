//! Actix-web extractor resolving the acting user.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use std::ops::Deref;
use tracing::warn;

use crate::config::USER_ID_HEADER;
use crate::db::{DbPool, users};
use crate::error::ErrorResponse;
use crate::models::{Actor, Role};

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires an active user.
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> impl Responder {
///     // user.actor() carries the id and role
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub actor: Actor,
    pub username: String,
}

impl CurrentUser {
    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Deref for CurrentUser {
    type Target = Actor;

    fn deref(&self) -> &Actor {
        &self.actor
    }
}

fn parse_user_id(req: &HttpRequest) -> Result<i32, AuthError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| AuthError::new(format!("Missing {} header", USER_ID_HEADER)))?;

    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .ok_or_else(|| AuthError::new(format!("Invalid {} header", USER_ID_HEADER)))
}

impl FromRequest for CurrentUser {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let user_id = parse_user_id(req);

        Box::pin(async move {
            let pool = pool.ok_or_else(|| AuthError::new("Internal configuration error"))?;
            let user_id = user_id?;

            let user = users::find_by_id(pool.connection(), user_id)
                .await
                .map_err(|e| {
                    warn!("User lookup failed: {}", e);
                    AuthError::new("Unable to verify user")
                })?
                .ok_or_else(|| AuthError::new("Unknown user"))?;

            if !user.is_active {
                return Err(AuthError::new("User account is inactive"));
            }

            Ok(CurrentUser {
                actor: Actor::new(user.id, Role::parse(&user.role).unwrap_or_default()),
                username: user.username,
            })
        })
    }
}
