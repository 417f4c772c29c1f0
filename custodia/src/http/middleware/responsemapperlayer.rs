use axum::body::Body;
use axum::http::{HeaderValue, header};
use axum::response::Response;

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Rewrites plain-text 4xx bodies produced by extractor rejections and
/// unmatched routes into `{"message": ...}` so every client error is JSON.
pub async fn response_mapper_layer(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    if !response.status().is_client_error() || is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) if !bytes.is_empty() => {
            String::from_utf8_lossy(&bytes).to_string()
        }
        _ => parts
            .status
            .canonical_reason()
            .unwrap_or("client error")
            .to_string(),
    };
    let new_body = serde_json::json!({ "message": message }).to_string();
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(new_body.len()));

    Response::from_parts(parts, Body::from(new_body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/unprocessable",
                get(|| async {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid input")
                }),
            )
            .route(
                "/json",
                get(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({"code": "INVALID_PARAM"})),
                    )
                }),
            )
            .route("/ok", get(|| async { (StatusCode::OK, "success") }))
            .layer(axum::middleware::from_fn(response_mapper_layer))
    }

    async fn get_path(path: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_response_mapper_wraps_plain_text() {
        let response = get_path("/unprocessable").await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body_json(response).await["message"], "invalid input");
    }

    #[tokio::test]
    async fn test_response_mapper_wraps_empty_not_found() {
        let response = get_path("/no-such-route").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_response_mapper_keeps_json_errors() {
        let response = get_path("/json").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_PARAM");
    }

    #[tokio::test]
    async fn test_response_mapper_passthrough() {
        let response = get_path("/ok").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, "success");
    }
}
