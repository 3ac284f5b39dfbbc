// src/metrics/exporter.rs
use super::MetricsRegistry;
use crate::server::response::{json_response, text_response};
use anyhow::{Context, Result};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Bind the Prometheus endpoint and serve it on a background task.
pub fn spawn_metrics_server(
    addr: SocketAddr,
    registry: Arc<MetricsRegistry>,
    path: String,
) -> Result<()> {
    let metrics_path: Arc<str> = path.into();
    let service_path = metrics_path.clone();

    let make_service = make_service_fn(move |_| {
        let registry = registry.clone();
        let path = service_path.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let response = render(&registry, &path, &req);
                async move { Ok::<_, Infallible>(response) }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .with_context(|| format!("Failed to bind metrics server on {}", addr))?
        .serve(make_service);

    info!("Metrics server listening on http://{}{}", addr, metrics_path);

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(())
}

fn render(registry: &MetricsRegistry, path: &str, req: &Request<Body>) -> Response<Body> {
    if req.uri().path() != path {
        return text_response(StatusCode::NOT_FOUND, "Not Found", "text/plain");
    }

    match registry.gather() {
        Ok(metrics) => text_response(StatusCode::OK, metrics, TEXT_FORMAT),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "detail": e.to_string() }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn render_serves_only_the_metrics_path() {
        let registry = MetricsRegistry::new().unwrap();
        registry
            .collector()
            .record_upstream(true, Duration::from_millis(5));

        let req = Request::get("/metrics").body(Body::empty()).unwrap();
        let response = render(&registry, "/metrics", &req);
        assert_eq!(response.status(), StatusCode::OK);
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("tor_status_upstream_requests_total"));

        let req = Request::get("/other").body(Body::empty()).unwrap();
        assert_eq!(render(&registry, "/metrics", &req).status(), StatusCode::NOT_FOUND);
    }
}
