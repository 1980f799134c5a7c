use std::time::Duration;

use axum::http::{HeaderName, Request, Response};
use axum::{body::Body, middleware::Next};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::{DefaultOnRequest, OnResponse, TraceLayer};
use tracing::{field::Empty, Span};

/// Request id as seen by handlers (taken from the `x-request-id` header).
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Stores the request id in request extensions and on the current span.
pub async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> axum::response::Response {
    let rid = req
        .headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| "n/a".to_string());

    req.extensions_mut().insert(XRequestId(rid.clone()));
    Span::current().record("request_id", tracing::field::display(&rid));

    next.run(req).await
}

/// Records status and latency on the `http_request` span.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordStatus;

impl<B> OnResponse<B> for RecordStatus {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        let latency_ms = latency.as_millis() as u64;
        span.record("status", status);
        span.record("latency_ms", latency_ms);
        tracing::debug!(parent: span, status, latency_ms, "request finished");
    }
}

pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    DefaultOnRequest,
    RecordStatus,
>;

fn make_request_span(req: &Request<Body>) -> Span {
    let rid = req
        .headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a");
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        version = ?req.version(),
        request_id = %rid,
        status = Empty,
        latency_ms = Empty
    )
}

pub fn create_trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as fn(&Request<Body>) -> Span)
        .on_response(RecordStatus)
}
