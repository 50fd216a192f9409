use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
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

use crate::error::CustomerResult;
use crate::models::{
    CreateCustomer, CustomerDiscountDto, CustomerDto, ListCustomersParams, UpdateCustomer,
};
use crate::service::CustomerService;

pub const TAG: &str = "Customers";

/// OpenAPI documentation for Customers API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_customers,
        create_customer,
        get_customer,
        update_customer,
        delete_customer,
        get_customer_discount,
    ),
    components(
        schemas(
            CustomerDto,
            CustomerDiscountDto,
            CreateCustomer,
            UpdateCustomer,
            PagedList<CustomerDto>
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
        (name = TAG, description = "Customer management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the customer router with all HTTP endpoints
pub fn router(service: CustomerService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .route("/{id}/discount", get(get_customer_discount))
        .with_state(shared_service)
}

/// List customers with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListCustomersParams),
    responses(
        (status = 200, description = "Page of customers", body = PagedList<CustomerDto>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_customers(
    State(service): State<Arc<CustomerService>>,
    Query(params): Query<ListCustomersParams>,
) -> CustomerResult<Json<PagedList<CustomerDto>>> {
    let page = service.list_customers(params).await?;
    Ok(Json(page.map(|c| CustomerDto::from(&c))))
}

/// Register a new customer
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer created successfully", body = CustomerDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_customer(
    State(service): State<Arc<CustomerService>>,
    ValidatedJson(input): ValidatedJson<CreateCustomer>,
) -> CustomerResult<impl IntoResponse> {
    let customer = service.create_customer(input).await?;
    Ok((StatusCode::CREATED, Json(CustomerDto::from(&customer))))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_customer(
    State(service): State<Arc<CustomerService>>,
    UuidPath(id): UuidPath,
) -> CustomerResult<Json<CustomerDto>> {
    let customer = service.get_customer(id).await?;
    Ok(Json(CustomerDto::from(&customer)))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomer,
    responses(
        (status = 200, description = "Customer updated successfully", body = CustomerDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_customer(
    State(service): State<Arc<CustomerService>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCustomer>,
) -> CustomerResult<Json<CustomerDto>> {
    let customer = service.update_customer(id, input).await?;
    Ok(Json(CustomerDto::from(&customer)))
}

/// Soft-delete a customer
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_customer(
    State(service): State<Arc<CustomerService>>,
    UuidPath(id): UuidPath,
) -> CustomerResult<impl IntoResponse> {
    service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the current discount position of a customer
#[utoipa::path(
    get,
    path = "/{id}/discount",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Current discount", body = CustomerDiscountDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_customer_discount(
    State(service): State<Arc<CustomerService>>,
    UuidPath(id): UuidPath,
) -> CustomerResult<Json<CustomerDiscountDto>> {
    let discount = service.customer_discount(id).await?;
    Ok(Json(discount))
}
