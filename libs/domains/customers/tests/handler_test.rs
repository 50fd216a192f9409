//! Handler tests for the Customers domain

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bakery_store::Table;
use chrono::NaiveTime;
use domain_customers::*;
use domain_markets::{CreateMarket, Market};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn app() -> (CustomerService, axum::Router, uuid::Uuid) {
    let markets = Table::new();
    let market = Market::new(CreateMarket {
        name: "Forno Centrale".to_string(),
        address: "Via Roma 1".to_string(),
        city: "Torino".to_string(),
        opening_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        closing_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        open: None,
    });
    let market_id = market.id;
    markets.insert(market).await;

    let service = CustomerService::new(Table::new(), markets);
    let router = handlers::router(service.clone());
    (service, router, market_id)
}

fn create_body(email: &str, market_id: uuid::Uuid) -> Body {
    Body::from(
        serde_json::to_string(&json!({
            "first_name": "Ada",
            "last_name": "Rossi",
            "email": email,
            "date_of_birth": "1990-04-12",
            "market_id": market_id,
            "vip": true
        }))
        .unwrap(),
    )
}

#[tokio::test]
async fn test_create_customer_returns_201() {
    let (_service, app, market_id) = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(create_body("ada@example.com", market_id))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let customer: Value = json_body(response.into_body()).await;
    assert_eq!(customer["email"], "ada@example.com");
    assert_eq!(customer["full_name"], "Ada Rossi");
}

#[tokio::test]
async fn test_create_customer_with_bad_email_returns_400() {
    let (_service, app, market_id) = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(create_body("not-an-email", market_id))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_customer_with_unknown_market_returns_400() {
    let (_service, app, _market_id) = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(create_body("ada@example.com", uuid::Uuid::new_v4()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_returns_409() {
    let (_service, app, market_id) = app().await;

    let first = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(create_body("ada@example.com", market_id))
        .unwrap();
    let response = app.clone().oneshot(first).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let second = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(create_body("ada@example.com", market_id))
        .unwrap();
    let response = app.oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_discount_endpoint_returns_tier() {
    let (service, app, market_id) = app().await;

    let customer = service
        .create_customer(CreateCustomer {
            first_name: "Ada".to_string(),
            last_name: "Rossi".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            market_id,
            vip: Some(true),
        })
        .await
        .unwrap();

    let request = Request::builder()
        .uri(format!("/{}/discount", customer.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let discount: Value = json_body(response.into_body()).await;
    assert_eq!(discount["vip"], true);
    assert_eq!(discount["discount_percent"], 0);
}

#[tokio::test]
async fn test_discount_for_unknown_customer_returns_404() {
    let (_service, app, _market_id) = app().await;

    let request = Request::builder()
        .uri(format!("/{}/discount", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
