//! Application state management

use bakery_store::Table;
use domain_customers::Customer;
use domain_markets::Market;
use domain_products::Product;

/// In-memory storage shared by every domain service. Cloning is cheap:
/// each table is a handle onto the same committed rows.
#[derive(Clone, Default)]
pub struct BakeryStore {
    pub products: Table<Product>,
    pub customers: Table<Customer>,
    pub markets: Table<Market>,
}

impl BakeryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub store: BakeryStore,
}
