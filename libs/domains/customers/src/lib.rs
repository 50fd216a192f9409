//! Customer domain: registered customers, VIP tiers and discounts.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{CustomerError, CustomerResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateCustomer, Customer, CustomerDiscountDto, CustomerDto, ListCustomersParams,
    UpdateCustomer,
};
pub use service::{CustomerRegistry, CustomerService};
