//! Handler tests for the Products domain

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bakery_store::Table;
use chrono::NaiveTime;
use domain_markets::{CreateMarket, Market};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn app() -> (ProductService, axum::Router, uuid::Uuid) {
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

    let service = ProductService::new(Table::new(), markets);
    let router = handlers::router(service.clone());
    (service, router, market_id)
}

fn pizza_body(name: &str, market_id: uuid::Uuid) -> Body {
    Body::from(
        serde_json::to_string(&json!({
            "name": name,
            "description": "Tomato, mozzarella, basil",
            "price_cents": 850,
            "market_id": market_id,
            "kind": "pizza",
            "pizza_style": "margherita",
            "pizza_size": "large",
            "ingredients": ["tomato", "mozzarella", "basil"]
        }))
        .unwrap(),
    )
}

fn post(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_create_pizza_returns_201_with_subtype_fields() {
    let (_service, app, market_id) = app().await;

    let response = app
        .oneshot(post("/", pizza_body("Margherita", market_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Value = json_body(response.into_body()).await;
    assert_eq!(product["name"], "Margherita");
    assert_eq!(product["category"], "pizza");
    assert_eq!(product["pizza_style"], "margherita");
    assert_eq!(product["preparation_time_minutes"], 25);
    assert!(product.get("bread_type").is_none());
}

#[tokio::test]
async fn test_create_without_required_subtype_field_returns_400() {
    let (_service, app, market_id) = app().await;

    let body = Body::from(
        serde_json::to_string(&json!({
            "name": "Mystery bread",
            "price_cents": 350,
            "market_id": market_id,
            "kind": "bread"
        }))
        .unwrap(),
    );

    let response = app.oneshot(post("/", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_name_returns_409() {
    let (_service, app, market_id) = app().await;

    let response = app
        .clone()
        .oneshot(post("/", pizza_body("Margherita", market_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post("/", pizza_body("Margherita", market_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_unknown_product_returns_404() {
    let (_service, app, _market_id) = app().await;

    let request = Request::builder()
        .uri(format!("/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_returns_204_and_listing_shrinks() {
    let (service, app, market_id) = app().await;

    let response = app
        .clone()
        .oneshot(post("/", pizza_body("Margherita", market_id)))
        .await
        .unwrap();
    let product: Value = json_body(response.into_body()).await;
    let id = product["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let page = service
        .list_products(ListProductsParams::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_list_with_price_filter_and_paging_envelope() {
    let (_service, app, market_id) = app().await;

    for (name, price) in [("Margherita", 850), ("Calzone", 1200), ("Diavola", 2500)] {
        let body = Body::from(
            serde_json::to_string(&json!({
                "name": name,
                "price_cents": price,
                "market_id": market_id,
                "kind": "pizza",
                "pizza_style": "margherita"
            }))
            .unwrap(),
        );
        let response = app.clone().oneshot(post("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = Request::builder()
        .uri("/?min_price_cents=500&max_price_cents=2000&sort_by=price")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["total_count"], 2);
    assert_eq!(page["page_number"], 1);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["has_next_page"], false);
    assert_eq!(page["items"][0]["name"], "Margherita");
    assert_eq!(page["items"][1]["name"], "Calzone");
}

#[tokio::test]
async fn test_list_with_invalid_price_range_returns_400() {
    let (_service, app, _market_id) = app().await;

    let request = Request::builder()
        .uri("/?min_price_cents=2000&max_price_cents=500")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_market_endpoint_lists_only_orderable_products() {
    let (_service, app, market_id) = app().await;

    let response = app
        .clone()
        .oneshot(post("/", pizza_body("Margherita", market_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let unavailable = Body::from(
        serde_json::to_string(&json!({
            "name": "Calzone",
            "price_cents": 1200,
            "available": false,
            "market_id": market_id,
            "kind": "pizza",
            "pizza_style": "calzone"
        }))
        .unwrap(),
    );
    let response = app.clone().oneshot(post("/", unavailable)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri(format!("/market/{market_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Value = json_body(response.into_body()).await;
    let items = products.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Margherita");
}
