//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Bakery API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bakery API",
        version = "0.1.0",
        description = "Bakery back-office API: product catalog, customers and markets",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/customers", api = domain_customers::ApiDoc),
        (path = "/api/markets", api = domain_markets::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Customers", description = "Customer management endpoints"),
        (name = "Markets", description = "Market management endpoints")
    )
)]
pub struct ApiDoc;
