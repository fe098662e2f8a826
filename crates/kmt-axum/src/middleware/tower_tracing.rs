use crate::HeaderMapExt;
use axum::{
    body::Body,
    http::{Request, Response},
};
use kmt_core::LazyLock;
use std::time::Duration;
use tower_http::{
    classify::{SharedClassifier, StatusInRangeAsFailures, StatusInRangeFailureClass},
    trace::{DefaultOnBodyChunk, DefaultOnEos, TraceLayer},
};
use tracing::{Span, field::Empty};

// Type aliases.
type NewMakeSpan = fn(&Request<Body>) -> Span;
type NewOnRequest = fn(&Request<Body>, &Span);
type NewOnResponse = fn(&Response<Body>, Duration, &Span);
type NewOnFailure = fn(StatusInRangeFailureClass, Duration, &Span);
type NewTraceLayer = TraceLayer<
    SharedClassifier<StatusInRangeAsFailures>,
    NewMakeSpan,
    NewOnRequest,
    NewOnResponse,
    DefaultOnBodyChunk,
    DefaultOnEos,
    NewOnFailure,
>;

// Tracing middleware.
pub(crate) static TRACING_MIDDLEWARE: LazyLock<NewTraceLayer> = LazyLock::new(|| {
    let classifier = StatusInRangeAsFailures::new_for_client_and_server_errors();
    TraceLayer::new(classifier.into_make_classifier())
        .make_span_with(new_make_span as NewMakeSpan)
        .on_request(new_on_request as NewOnRequest)
        .on_response(new_on_response as NewOnResponse)
        .on_failure(new_on_failure as NewOnFailure)
});

fn new_make_span(request: &Request<Body>) -> Span {
    let uri = request.uri();
    let headers = request.headers();
    tracing::info_span!(
        "HTTP request",
        "http.method" = request.method().as_str(),
        "http.target" = uri.path_and_query().map(|p| p.as_str()),
        "http.user_agent" = headers.get_str("user-agent"),
        "http.status_code" = Empty,
        "http.server.duration" = Empty,
        "context.language" = Empty,
    )
}

fn new_on_request(request: &Request<Body>, span: &Span) {
    let headers = request.headers();
    span.record("context.language", headers.accept_language());
    tracing::debug!("started processing request");
}

fn new_on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("http.status_code", response.status().as_u16());
    span.record(
        "http.server.duration",
        u64::try_from(latency.as_millis()).ok(),
    );
    tracing::info!("finished processing request");
}

fn new_on_failure(error: StatusInRangeFailureClass, latency: Duration, span: &Span) {
    span.record(
        "http.server.duration",
        u64::try_from(latency.as_millis()).ok(),
    );
    match error {
        StatusInRangeFailureClass::StatusCode(status_code) => {
            span.record("http.status_code", status_code.as_u16());
            tracing::error!("response failed");
        }
        StatusInRangeFailureClass::Error(err) => {
            tracing::error!(err);
        }
    }
}
