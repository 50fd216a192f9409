//! API routes module

use axum::Router;
use domain_customers::CustomerService;
use domain_markets::MarketService;
use domain_products::ProductService;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let store = &state.store;

    let products = ProductService::new(store.products.clone(), store.markets.clone());
    let customers = CustomerService::new(store.customers.clone(), store.markets.clone());
    let markets = MarketService::new(store.markets.clone());

    Router::new()
        .nest("/products", domain_products::handlers::router(products))
        .nest("/customers", domain_customers::handlers::router(customers))
        .nest("/markets", domain_markets::handlers::router(markets))
}
