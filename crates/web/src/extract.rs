//! Drop-in replacements for axum's `Query`, `Path` and `Json` whose rejections
//! are rendered as [`WebError`] instead of axum's plain-text bodies.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::WebError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WebError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(WebError))]
pub struct Path<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct YearQuery {
        year: Option<i32>,
    }

    #[derive(Deserialize, Serialize)]
    struct Payload {
        name: String,
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/season",
                get(|Query(q): Query<YearQuery>| async move { Json(q.year) }),
            )
            .route(
                "/items/:id",
                get(|Path(id): Path<Uuid>| async move { Json(id) }),
            )
            .route(
                "/echo",
                post(|Json(payload): Json<Payload>| async move { Json(payload) }),
            )
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn malformed_query_is_a_json_bad_request() {
        let response = router()
            .oneshot(Request::get("/season?year=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("year"));
    }

    #[tokio::test]
    async fn malformed_path_is_a_json_bad_request() {
        let response = router()
            .oneshot(Request::get("/items/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_bad_request() {
        let request = Request::post("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": 5}"))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn well_formed_requests_pass_through() {
        let response = router()
            .oneshot(Request::get("/season?year=2024").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(error_body(response).await, serde_json::json!(2024));
    }
}
