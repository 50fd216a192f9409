use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use bakery_store::PagedList;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    BreadType, CakeFlavor, CreateProduct, ListProductsParams, PastryType, PizzaSize, PizzaStyle,
    ProductDto, ProductKind, ProductSort, SortDirection, UpdateProduct,
};
use crate::service::ProductService;

pub const TAG: &str = "Products";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        purge_product,
        list_available_products,
    ),
    components(
        schemas(
            ProductDto,
            CreateProduct,
            UpdateProduct,
            ProductKind,
            PizzaStyle,
            PizzaSize,
            BreadType,
            CakeFlavor,
            PastryType,
            ProductSort,
            SortDirection,
            PagedList<ProductDto>
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router(service: ProductService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/permanent", delete(purge_product))
        .route("/market/{market_id}", get(list_available_products))
        .with_state(shared_service)
}

/// List products with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListProductsParams),
    responses(
        (status = 200, description = "Page of products", body = PagedList<ProductDto>),
        (status = 400, description = "Invalid filter or paging parameters"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(params): Query<ListProductsParams>,
) -> ProductResult<Json<PagedList<ProductDto>>> {
    let page = service.list_products(params).await?;
    Ok(Json(page.map(|p| ProductDto::from(&p))))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product(
    State(service): State<Arc<ProductService>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(&product))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductDto>> {
    let product = service.get_product(id).await?;
    Ok(Json(ProductDto::from(&product)))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductDto>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(ProductDto::from(&product)))
}

/// Soft-delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Permanently remove a product
#[utoipa::path(
    delete,
    path = "/{id}/permanent",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product removed permanently"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn purge_product(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.purge_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List orderable products of one market
#[utoipa::path(
    get,
    path = "/market/{market_id}",
    tag = TAG,
    params(
        ("market_id" = Uuid, Path, description = "Market ID")
    ),
    responses(
        (status = 200, description = "Orderable products of the market", body = Vec<ProductDto>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_available_products(
    State(service): State<Arc<ProductService>>,
    UuidPath(market_id): UuidPath,
) -> ProductResult<Json<Vec<ProductDto>>> {
    let products = service.available_products(market_id).await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}
