mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_bytes, response_json, TestApp};

#[tokio::test]
async fn forecast_worked_example_two_steady_state_reviews() {
    let app = TestApp::new();
    // Flat 10/day for 30 days, 200 on hand, floor of 50.
    let id = app.seed_flat_product("Arabica 1kg", 50.0, 30, 10.0, 200.0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/forecast/{id}"),
            Some(json!({"months": 1, "review_days": 15})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let plan = body["plan"].as_array().expect("plan array");
    assert_eq!(plan.len(), 2);
    for entry in plan {
        assert_eq!(entry["stock_before"], 50.0);
        assert_eq!(entry["demand_next"], 150.0);
        assert_eq!(entry["order_qty"], 150.0);
    }
    // Anchored at the last record (2025-05-30), reviews land 15 days apart.
    assert_eq!(plan[0]["review_date"], "2025-06-14");
    assert_eq!(plan[1]["review_date"], "2025-06-29");

    assert_eq!(body["summary"]["total_order_qty"], 300.0);
    assert_eq!(body["summary"]["next_review_date"], "2025-06-14");
    // A perfectly flat history backtests at full confidence.
    assert_eq!(body["summary"]["accuracy_pct"], 100.0);
}

#[tokio::test]
async fn identical_requests_return_byte_identical_plans() {
    let app = TestApp::new();
    let id = app.seed_flat_product("Decaf 500g", 30.0, 45, 7.0, 120.0).await;

    let payload = json!({"months": 2, "review_days": 14});
    let first = app
        .request(Method::POST, &format!("/api/v1/forecast/{id}"), Some(payload.clone()))
        .await;
    let second = app
        .request(Method::POST, &format!("/api/v1/forecast/{id}"), Some(payload))
        .await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(response_bytes(first).await, response_bytes(second).await);
}

#[tokio::test]
async fn non_positive_horizon_fields_are_rejected_before_computation() {
    let app = TestApp::new();
    let id = app.seed_flat_product("Beans", 10.0, 10, 5.0, 60.0).await;

    for payload in [
        json!({"months": 0, "review_days": 15}),
        json!({"months": 1, "review_days": 0}),
    ] {
        let response = app
            .request(Method::POST, &format!("/api/v1/forecast/{id}"), Some(payload))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn non_numeric_horizon_fields_are_rejected() {
    let app = TestApp::new();
    let id = app.seed_flat_product("Beans", 10.0, 10, 5.0, 60.0).await;

    for payload in [
        json!({"months": "three", "review_days": 15}),
        json!({"months": 1, "review_days": -2}),
    ] {
        let response = app
            .request(Method::POST, &format!("/api/v1/forecast/{id}"), Some(payload))
            .await;
        // The JSON extractor rejects these before the engine runs.
        assert!(response.status().is_client_error());
    }
}

#[tokio::test]
async fn unknown_product_is_a_404_with_no_plan() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/v1/forecast/00000000-0000-0000-0000-000000000099",
            Some(json!({"months": 1, "review_days": 15})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body.get("plan").is_none());
}

#[tokio::test]
async fn empty_history_degrades_to_a_zeroed_plan() {
    let app = TestApp::new();
    let id = app.seed_flat_product("New product", 40.0, 0, 0.0, 0.0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/forecast/{id}"),
            Some(json!({"months": 2, "review_days": 10})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let plan = body["plan"].as_array().unwrap();
    assert_eq!(plan.len(), 6);
    for entry in plan {
        assert_eq!(entry["demand_next"], 0.0);
        assert_eq!(entry["order_qty"], 0.0);
    }
    assert_eq!(body["summary"]["total_order_qty"], 0.0);
    assert_eq!(body["summary"]["accuracy_pct"], serde_json::Value::Null);
}

#[tokio::test]
async fn cadence_beyond_horizon_returns_a_valid_empty_plan() {
    let app = TestApp::new();
    let id = app.seed_flat_product("Slow mover", 5.0, 20, 1.0, 90.0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/forecast/{id}"),
            Some(json!({"months": 1, "review_days": 45})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["plan"].as_array().unwrap().len(), 0);
    assert_eq!(body["summary"]["next_review_date"], serde_json::Value::Null);
    assert_eq!(body["summary"]["total_order_qty"], 0.0);
}

#[tokio::test]
async fn short_history_leaves_accuracy_absent_but_still_plans() {
    let app = TestApp::new();
    // 10 points is below the backtest minimum.
    let id = app.seed_flat_product("Fresh listing", 20.0, 10, 4.0, 80.0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/forecast/{id}"),
            Some(json!({"months": 1, "review_days": 15})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["plan"].as_array().unwrap().len(), 2);
    assert_eq!(body["summary"]["accuracy_pct"], serde_json::Value::Null);
    assert!(body["summary"]["total_order_qty"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn saved_plans_flow_through_the_alerts_log() {
    let app = TestApp::new();
    let id = app.seed_flat_product("Arabica 1kg", 50.0, 30, 10.0, 200.0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/forecast/{id}/save"),
            Some(json!({"months": 1, "review_days": 15})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = response_json(response).await;
    let run_id = saved["run_id"].as_str().expect("run id").to_string();
    assert_eq!(saved["plan"].as_array().unwrap().len(), 2);
    assert_eq!(saved["summary"]["total_order_qty"], 300.0);

    let response = app.request(Method::GET, "/api/v1/alerts", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let alerts = response_json(response).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a["run_id"] == run_id.as_str()));
    assert_eq!(alerts[0]["product_name"], "Arabica 1kg");

    let response = app
        .request(Method::DELETE, &format!("/api/v1/alerts/{run_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, "/api/v1/alerts", None).await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 0);

    // Deleting the same run twice reports not found.
    let response = app
        .request(Method::DELETE, &format!("/api/v1/alerts/{run_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn operational_endpoints_respond() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");

    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/metrics", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/metrics/json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn error_responses_carry_a_request_id() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/v1/forecast/00000000-0000-0000-0000-000000000001",
            Some(json!({"months": 1, "review_days": 15})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("x-request-id").is_some());
    let body = response_json(response).await;
    assert!(body["request_id"].as_str().is_some());
}
