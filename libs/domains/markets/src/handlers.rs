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

use crate::error::MarketResult;
use crate::models::{CreateMarket, ListMarketsParams, MarketDto, UpdateMarket};
use crate::service::MarketService;

pub const TAG: &str = "Markets";

/// OpenAPI documentation for Markets API
#[derive(OpenApi)]
#[openapi(
    paths(list_markets, create_market, get_market, update_market, delete_market),
    components(
        schemas(MarketDto, CreateMarket, UpdateMarket, PagedList<MarketDto>),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Market management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the market router with all HTTP endpoints
pub fn router(service: MarketService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_markets).post(create_market))
        .route(
            "/{id}",
            get(get_market).put(update_market).delete(delete_market),
        )
        .with_state(shared_service)
}

/// List markets with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListMarketsParams),
    responses(
        (status = 200, description = "Page of markets", body = PagedList<MarketDto>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_markets(
    State(service): State<Arc<MarketService>>,
    Query(params): Query<ListMarketsParams>,
) -> MarketResult<Json<PagedList<MarketDto>>> {
    let page = service.list_markets(params).await?;
    Ok(Json(page.map(|m| MarketDto::from(&m))))
}

/// Create a new market
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateMarket,
    responses(
        (status = 201, description = "Market created successfully", body = MarketDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_market(
    State(service): State<Arc<MarketService>>,
    ValidatedJson(input): ValidatedJson<CreateMarket>,
) -> MarketResult<impl IntoResponse> {
    let market = service.create_market(input).await?;
    Ok((StatusCode::CREATED, Json(MarketDto::from(&market))))
}

/// Get a market by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Market ID")
    ),
    responses(
        (status = 200, description = "Market found", body = MarketDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_market(
    State(service): State<Arc<MarketService>>,
    UuidPath(id): UuidPath,
) -> MarketResult<Json<MarketDto>> {
    let market = service.get_market(id).await?;
    Ok(Json(MarketDto::from(&market)))
}

/// Update a market
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Market ID")
    ),
    request_body = UpdateMarket,
    responses(
        (status = 200, description = "Market updated successfully", body = MarketDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_market(
    State(service): State<Arc<MarketService>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMarket>,
) -> MarketResult<Json<MarketDto>> {
    let market = service.update_market(id, input).await?;
    Ok(Json(MarketDto::from(&market)))
}

/// Soft-delete a market
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Market ID")
    ),
    responses(
        (status = 204, description = "Market deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_market(
    State(service): State<Arc<MarketService>>,
    UuidPath(id): UuidPath,
) -> MarketResult<impl IntoResponse> {
    service.delete_market(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
