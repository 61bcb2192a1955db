use prefs_app::RequestContext;
use prefs_contracts::{AppError, AppResult, codes};
use prefs_logging::sanitize_for_log;
use std::future::Future;
use std::time::Instant;

const REQUEST_SLOW_TRACE_MS: u64 = 300;
const CLIENT_ERROR_CODES: [&str; 3] = [
    codes::USER_NOT_FOUND,
    codes::INVALID_REQUEST_BODY,
    codes::UNSUPPORTED_FORM_ENCODING,
];

fn request_start(context: &RequestContext) -> Instant {
    tracing::debug!(
        event = "request_start",
        route = context.route(),
        request_id = context.request_id()
    );
    Instant::now()
}

fn request_end_ok(context: &RequestContext, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis() as u64;
    if duration_ms >= REQUEST_SLOW_TRACE_MS {
        tracing::info!(
            event = "request_end",
            route = context.route(),
            request_id = context.request_id(),
            ok = true,
            duration_ms = duration_ms
        );
    } else {
        tracing::debug!(
            event = "request_end",
            route = context.route(),
            request_id = context.request_id(),
            ok = true,
            duration_ms = duration_ms
        );
    }
}

fn request_end_error(context: &RequestContext, started_at: Instant, error: &AppError) {
    let duration_ms = started_at.elapsed().as_millis() as u64;
    let causes: Vec<String> = error
        .causes()
        .iter()
        .map(|cause| sanitize_for_log(cause))
        .collect();
    let primary_cause = causes.first().cloned().unwrap_or_default();

    // client-side outcomes, not server faults
    if CLIENT_ERROR_CODES.iter().any(|code| error.is_code(code)) {
        tracing::warn!(
            event = "request_end",
            route = context.route(),
            request_id = context.request_id(),
            ok = false,
            duration_ms = duration_ms,
            error_code = error.code()
        );
        return;
    }

    tracing::error!(
        event = "request_end",
        route = context.route(),
        request_id = context.request_id(),
        ok = false,
        duration_ms = duration_ms,
        error_code = error.code(),
        error_message = sanitize_for_log(error.message()),
        error_primary_cause = primary_cause.as_str(),
        error_causes_count = causes.len()
    );
}

/// Runs one request's work, logging its start, outcome and duration. Errors
/// come back tagged with the request id.
pub(crate) async fn run_request<T, Fut>(context: &RequestContext, op: Fut) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
{
    let started_at = request_start(context);
    let result = op.await;
    match &result {
        Ok(_) => request_end_ok(context, started_at),
        Err(error) => request_end_error(context, started_at, error),
    }
    result.map_err(|error| error.with_request_id(context.request_id()))
}
