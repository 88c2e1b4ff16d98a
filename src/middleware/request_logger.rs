//! Request logging middleware.
//!
//! Every request gets a debug line on arrival and one summary line when the
//! response is ready, tagged with the acting user from the identity header.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::USER_ID_HEADER;

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// What the summary line says about a finished request.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Completed,
    Rejected,
    Failed,
}

impl Outcome {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Outcome::Failed
        } else if status.is_client_error() {
            Outcome::Rejected
        } else {
            Outcome::Completed
        }
    }
}

/// The acting user as sent by the client; "anonymous" when the header is absent.
fn acting_user(req: &ServiceRequest) -> String {
    req.headers()
        .get(USER_ID_HEADER)
        .map(|v| v.to_str().unwrap_or("invalid").to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let user = acting_user(&req);

        debug!(
            target: "api",
            method = %method,
            path = %path,
            query = %req.query_string(),
            user = %user,
            "Request received"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status().as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;

            match Outcome::of(res.status()) {
                Outcome::Completed => info!(
                    target: "api",
                    method = %method, path = %path, user = %user,
                    status, duration_ms,
                    "Request completed"
                ),
                Outcome::Rejected => warn!(
                    target: "api",
                    method = %method, path = %path, user = %user,
                    status, duration_ms,
                    "Request rejected"
                ),
                Outcome::Failed => error!(
                    target: "api",
                    method = %method, path = %path, user = %user,
                    status, duration_ms,
                    "Request failed"
                ),
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn test_outcome_follows_status_class() {
        assert_eq!(Outcome::of(StatusCode::OK), Outcome::Completed);
        assert_eq!(Outcome::of(StatusCode::NOT_FOUND), Outcome::Rejected);
        assert_eq!(Outcome::of(StatusCode::CONFLICT), Outcome::Rejected);
        assert_eq!(Outcome::of(StatusCode::INTERNAL_SERVER_ERROR), Outcome::Failed);
    }

    #[::core::prelude::v1::test]
    fn test_acting_user_reads_identity_header() {
        let req = test::TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .to_srv_request();
        assert_eq!(acting_user(&req), "42");

        let anonymous = test::TestRequest::default().to_srv_request();
        assert_eq!(acting_user(&anonymous), "anonymous");
    }

    #[actix_rt::test]
    async fn test_responses_pass_through_unchanged() {
        let app = test::init_service(
            App::new()
                .wrap(RequestLogger)
                .route("/gone", web::get().to(|| async { HttpResponse::Gone().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/gone").to_request()).await;
        assert_eq!(resp.status(), StatusCode::GONE);
    }
}
