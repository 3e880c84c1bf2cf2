use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use easystock_api::{build_app, config::AppConfig, AppState};

/// Helper harness that spins up the full router with a fresh in-memory
/// store, exercising the same middleware stack as the binary.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let cfg = AppConfig {
            environment: "test".into(),
            ..AppConfig::default()
        };
        let (router, state) = build_app(cfg);
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response")
    }

    /// Creates a product with `days` of flat history and returns its id.
    #[allow(dead_code)]
    pub async fn seed_flat_product(
        &self,
        name: &str,
        min_stock_level: f64,
        days: usize,
        daily_sales: f64,
        stock_quantity: f64,
    ) -> String {
        let start: chrono::NaiveDate = "2025-05-01".parse().unwrap();
        let history: Vec<Value> = (0..days)
            .map(|i| {
                json!({
                    "date": (start + chrono::Duration::days(i as i64)).to_string(),
                    "daily_sales": daily_sales,
                    "stock_quantity": stock_quantity,
                })
            })
            .collect();

        let response = self
            .request(
                Method::POST,
                "/api/v1/products",
                Some(json!({
                    "name": name,
                    "min_stock_level": min_stock_level,
                    "history": history,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["id"].as_str().expect("product id").to_string()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[allow(dead_code)]
pub async fn response_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
        .to_vec()
}
