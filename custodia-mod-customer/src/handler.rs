use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use custodia::db::{AppDbHandle, AppDbPool, Handle};

use crate::{entity::Customer, service::CustomerService};

pub const DELETED_MESSAGE: &str = "Deleted Successfully";

#[derive(Clone)]
pub struct CustomerState {
    pub pool: AppDbPool,
    pub service: Arc<dyn CustomerService>,
}

impl CustomerState {
    pub fn new(pool: AppDbPool, service: Arc<dyn CustomerService>) -> Self {
        Self { pool, service }
    }

    /// One pooled connection per request, released when the handler ends.
    async fn handle(&self) -> custodia::Result<AppDbHandle> {
        Handle::acquire(&self.pool).await
    }
}

/// `/customer/` exists so that an empty id reaches the handler and is
/// reported as a missing parameter instead of an unmatched route.
pub fn router(state: CustomerState) -> Router {
    Router::new()
        .route("/customers", get(list))
        .route("/customer", post(create).put(update))
        .route("/customer/", get(get_by_id).delete(delete))
        .route("/customer/{id}", get(get_by_id).delete(delete))
        .with_state(state)
}

fn required_id(id: Option<Path<String>>) -> custodia::Result<String> {
    match id {
        Some(Path(id)) if !id.is_empty() => Ok(id),
        _ => Err(custodia::Error::missing_param("id")),
    }
}

/// Decodes the raw body as JSON whatever content type the client sent.
fn bind_body(body: &[u8]) -> custodia::Result<Customer> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!(error = %e, "error in binding");
        custodia::Error::invalid_param("body")
    })
}

async fn list(
    State(state): State<CustomerState>,
) -> custodia::Result<Json<Vec<Customer>>> {
    let customers = state.service.list(&mut state.handle().await?).await?;
    Ok(Json(customers))
}

async fn get_by_id(
    State(state): State<CustomerState>,
    id: Option<Path<String>>,
) -> custodia::Result<Json<Customer>> {
    let id = required_id(id)?;
    let mut h = state.handle().await?;
    let customer = state.service.get_by_id(&mut h, &id).await?;
    Ok(Json(customer))
}

async fn create(
    State(state): State<CustomerState>,
    body: Bytes,
) -> custodia::Result<(StatusCode, Json<Customer>)> {
    let customer = bind_body(&body)?;
    let mut h = state.handle().await?;
    let created = state.service.create(&mut h, customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<CustomerState>,
    body: Bytes,
) -> custodia::Result<Json<Customer>> {
    let customer = bind_body(&body)?;
    let mut h = state.handle().await?;
    let updated = state.service.update(&mut h, customer).await?;
    Ok(Json(updated))
}

async fn delete(
    State(state): State<CustomerState>,
    id: Option<Path<String>>,
) -> custodia::Result<&'static str> {
    let id = required_id(id)?;
    let mut h = state.handle().await?;
    state.service.delete(&mut h, &id).await?;
    Ok(DELETED_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, header},
        response::Response,
    };
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Echoes back fixed values and records what the handlers forwarded.
    #[derive(Default)]
    struct FakeService {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeService {
        fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        fn respond<T>(&self, call: String, value: T) -> custodia::Result<T> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(custodia::Error::Database(anyhow::anyhow!(
                    "error from service layer"
                )));
            }
            Ok(value)
        }
    }

    #[async_trait::async_trait]
    impl CustomerService for FakeService {
        async fn list(
            &self,
            _h: &mut AppDbHandle,
        ) -> custodia::Result<Vec<Customer>> {
            self.respond("list".into(), vec![abc()])
        }

        async fn get_by_id(
            &self,
            _h: &mut AppDbHandle,
            id: &str,
        ) -> custodia::Result<Customer> {
            self.respond(format!("get_by_id({id})"), abc())
        }

        async fn create(
            &self,
            _h: &mut AppDbHandle,
            customer: Customer,
        ) -> custodia::Result<Customer> {
            self.respond(
                format!("create({})", customer.name),
                Customer { id: 1, ..customer },
            )
        }

        async fn update(
            &self,
            _h: &mut AppDbHandle,
            customer: Customer,
        ) -> custodia::Result<Customer> {
            let call = format!("update({},{})", customer.id, customer.name);
            self.respond(call, customer)
        }

        async fn delete(
            &self,
            _h: &mut AppDbHandle,
            id: &str,
        ) -> custodia::Result<()> {
            self.respond(format!("delete({id})"), ())
        }
    }

    fn abc() -> Customer {
        Customer { id: 1, name: "abc".into() }
    }

    fn app(service: Arc<FakeService>) -> Router {
        let pool = sqlx::SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        router(CustomerState::new(pool, service))
    }

    async fn send(
        service: Arc<FakeService>,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        };
        app(service).oneshot(request.unwrap()).await.unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn calls(service: &FakeService) -> Vec<String> {
        service.calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_list() {
        let service = Arc::new(FakeService::default());
        let response =
            send(service.clone(), Method::GET, "/customers", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([{"id": 1, "name": "abc"}])
        );
        assert_eq!(calls(&service), vec!["list"]);
    }

    #[tokio::test]
    async fn test_list_service_error() {
        let service = Arc::new(FakeService::failing());
        let response = send(service, Method::GET, "/customers", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "DATABASE");
    }

    #[tokio::test]
    async fn test_get_by_id_forwards_raw_id() {
        let service = Arc::new(FakeService::default());
        let response =
            send(service.clone(), Method::GET, "/customer/abc", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "abc");
        // validation of the id belongs to the service
        assert_eq!(calls(&service), vec!["get_by_id(abc)"]);
    }

    #[tokio::test]
    async fn test_empty_id_is_missing_param() {
        for method in [Method::GET, Method::DELETE] {
            let service = Arc::new(FakeService::default());
            let response =
                send(service.clone(), method, "/customer/", None).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["code"], "MISSING_PARAM");
            assert_eq!(body["message"], "missing parameter: id");
            assert!(calls(&service).is_empty());
        }
    }

    #[tokio::test]
    async fn test_create() {
        let service = Arc::new(FakeService::default());
        let response = send(
            service.clone(),
            Method::POST,
            "/customer",
            Some(r#"{"name":"abc"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"id": 1, "name": "abc"})
        );
        assert_eq!(calls(&service), vec!["create(abc)"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_param() {
        for method in [Method::POST, Method::PUT] {
            let service = Arc::new(FakeService::default());
            let response = send(
                service.clone(),
                method,
                "/customer",
                Some(r#"{"name":"#),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["message"], "invalid parameter: body");
            assert!(calls(&service).is_empty());
        }
    }

    #[tokio::test]
    async fn test_body_is_decoded_whatever_the_content_type() {
        let content_types = [
            None,
            Some("application/x-www-form-urlencoded"),
            Some("text/plain"),
        ];
        for content_type in content_types {
            let service = Arc::new(FakeService::default());
            let mut request =
                Request::builder().method(Method::POST).uri("/customer");
            if let Some(content_type) = content_type {
                request = request.header(header::CONTENT_TYPE, content_type);
            }
            let request =
                request.body(Body::from(r#"{"name":"abc"}"#)).unwrap();
            let response = app(service.clone()).oneshot(request).await.unwrap();

            let status = response.status();
            assert_eq!(status, StatusCode::CREATED, "{content_type:?}");
            assert_eq!(body_json(response).await["name"], "abc");
            assert_eq!(calls(&service), vec!["create(abc)"]);
        }
    }

    #[tokio::test]
    async fn test_empty_or_mistyped_body_is_invalid_param() {
        for body in ["", "name=abc", r#"{"id":"1","name":"abc"}"#] {
            let service = Arc::new(FakeService::default());
            let response =
                send(service.clone(), Method::PUT, "/customer", Some(body))
                    .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
            assert_eq!(body_json(response).await["code"], "INVALID_PARAM");
            assert!(calls(&service).is_empty());
        }
    }

    #[tokio::test]
    async fn test_update() {
        let service = Arc::new(FakeService::default());
        let response = send(
            service.clone(),
            Method::PUT,
            "/customer",
            Some(r#"{"id":1,"name":"pqr"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "pqr");
        assert_eq!(calls(&service), vec!["update(1,pqr)"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = Arc::new(FakeService::default());
        let response =
            send(service.clone(), Method::DELETE, "/customer/1", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, DELETED_MESSAGE);
        assert_eq!(calls(&service), vec!["delete(1)"]);
    }

    #[tokio::test]
    async fn test_delete_service_error() {
        let service = Arc::new(FakeService::failing());
        let response =
            send(service, Method::DELETE, "/customer/2", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
