use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn get_or_generate_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Runs the request inside a span carrying its id and echoes the id back.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = get_or_generate_request_id(request.headers());
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| tracing::info!(status = %response.status(), "Request completed"));

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_request_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(get_or_generate_request_id(&headers), "abc-123");
    }

    #[test]
    fn test_missing_request_id_is_generated() {
        let id = get_or_generate_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
