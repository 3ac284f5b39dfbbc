// src/server/handler.rs
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::metrics::{MetricsCollector, Timer};
use crate::server::response::json_response;
use crate::status::StatusService;

pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct RequestHandler {
    status: Arc<StatusService>,
    route: Arc<str>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RequestHandler {
    pub fn new(status: Arc<StatusService>, route: impl Into<Arc<str>>) -> Self {
        Self {
            status,
            route: route.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let timer = Timer::new();
        let path = req.uri().path();

        let (label, response) = if path == &*self.route {
            let response = if req.method() == Method::GET {
                match self.status.summary().await {
                    Ok(summary) => json_response(StatusCode::OK, &summary),
                    Err(err) => err.into(),
                }
            } else {
                method_not_allowed()
            };
            (&*self.route, response)
        } else if path == HEALTH_PATH && req.method() == Method::GET {
            (HEALTH_PATH, health())
        } else {
            ("other", json_response(StatusCode::NOT_FOUND, &json!({ "detail": "Not Found" })))
        };

        debug!(status = response.status().as_u16(), "request complete");
        if let Some(metrics) = &self.metrics {
            metrics.record_request(label, response.status().as_u16(), timer.elapsed());
        }

        response
    }
}

fn health() -> Response<Body> {
    json_response(
        StatusCode::OK,
        &json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
    )
}

fn method_not_allowed() -> Response<Body> {
    let mut response = json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &json!({ "detail": "Method Not Allowed" }),
    );
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET"));
    response
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        let span = info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path(),
        );
        Box::pin(async move { Ok(handler.handle(req).await) }.instrument(span))
    }
}
