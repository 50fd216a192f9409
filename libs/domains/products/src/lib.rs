//! Product domain: the bakery catalog, one record per item with a tagged
//! subtype payload per category (pizza, bread, cake, pastry).

pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    BreadType, CakeFlavor, CreateProduct, ListProductsParams, PastryType, PizzaSize, PizzaStyle,
    Product, ProductDetails, ProductDto, ProductKind, ProductSort, SortDirection, UpdateProduct,
};
pub use query::ProductFilter;
pub use service::{ProductRegistry, ProductService};
