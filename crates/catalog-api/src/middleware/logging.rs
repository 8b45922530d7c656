//! Access logging.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::http::{Request, Response};
use tower::{Layer, Service};
use tracing::{info, warn};

use super::request_id::RequestId;

/// Logs one line when a request starts and one when it completes.
///
/// Server errors are logged at WARN. Events use the `catalog::http` target.
#[derive(Clone, Default)]
pub struct RequestLoggingLayer;

impl RequestLoggingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService { inner }
    }
}

#[derive(Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string());

        info!(
            target: "catalog::http",
            request_id = request_id.as_deref(),
            method = %method,
            path = %path,
            "request started"
        );

        let start = Instant::now();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(request).await?;
            let status = response.status().as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;

            if response.status().is_server_error() {
                warn!(
                    target: "catalog::http",
                    request_id = request_id.as_deref(),
                    method = %method,
                    path = %path,
                    status,
                    duration_ms,
                    "request failed"
                );
            } else {
                info!(
                    target: "catalog::http",
                    request_id = request_id.as_deref(),
                    method = %method,
                    path = %path,
                    status,
                    duration_ms,
                    "request completed"
                );
            }

            Ok(response)
        })
    }
}
