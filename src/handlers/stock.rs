use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_role, AuthUser, ADMIN_ONLY, ALL_ROLES, WAREHOUSE_DESK};
use crate::entities::stock_item;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::services::stock::{NewStockItem, StockItemPatch};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStockItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub item_name: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: i64,
}

impl From<CreateStockItemRequest> for NewStockItem {
    fn from(request: CreateStockItemRequest) -> Self {
        Self {
            item_name: request.item_name,
            category: request.category,
            unit_price: request.unit_price,
            quantity: request.quantity,
        }
    }
}

/// Create accepts a single item or a batch; a batch is applied atomically.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CreateStockPayload {
    One(CreateStockItemRequest),
    Many(Vec<CreateStockItemRequest>),
}

impl Validate for CreateStockPayload {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Self::One(item) => item.validate(),
            Self::Many(items) => {
                for item in items {
                    item.validate()?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStockItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub item_name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<i64>,
}

/// List all stock items
#[utoipa::path(
    get,
    path = "/stock",
    responses(
        (status = 200, description = "All stock items"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<stock_item::Model>>>, ServiceError> {
    require_role(&user, ALL_ROLES)?;
    let items = state.services.stock.list().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Get one stock item
#[utoipa::path(
    get,
    path = "/stock/{id}",
    params(("id" = i64, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Stock item"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn get_stock_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<stock_item::Model>>, ServiceError> {
    require_role(&user, ALL_ROLES)?;
    let item = state.services.stock.get(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Add stock, one item or a batch
#[utoipa::path(
    post,
    path = "/stock",
    request_body = CreateStockPayload,
    responses(
        (status = 201, description = "Stock added"),
        (status = 400, description = "Invalid entry in payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn create_stock(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<CreateStockPayload>,
) -> Result<Response, ServiceError> {
    require_role(&user, WAREHOUSE_DESK)?;

    match payload {
        CreateStockPayload::One(item) => {
            let created = state.services.stock.create_batch(vec![item.into()]).await?;
            let item = created.into_iter().next().ok_or_else(|| {
                ServiceError::InternalError("insert returned no rows".to_string())
            })?;
            Ok((StatusCode::CREATED, Json(ApiResponse::success(item))).into_response())
        }
        CreateStockPayload::Many(items) => {
            let created = state
                .services
                .stock
                .create_batch(items.into_iter().map(Into::into).collect())
                .await?;
            Ok((StatusCode::CREATED, Json(ApiResponse::success(created))).into_response())
        }
    }
}

/// Partially update a stock item
#[utoipa::path(
    put,
    path = "/stock/{id}",
    params(("id" = i64, Path, description = "Stock item id")),
    request_body = UpdateStockItemRequest,
    responses(
        (status = 200, description = "Stock updated", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn update_stock_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
    ValidJson(request): ValidJson<UpdateStockItemRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, WAREHOUSE_DESK)?;

    let patch = StockItemPatch {
        item_name: request.item_name,
        category: request.category,
        unit_price: request.unit_price,
        quantity: request.quantity,
    };
    state.services.stock.update(id, patch).await?;
    Ok(Json(MessageResponse::new("Stock updated")))
}

/// Delete a stock item
#[utoipa::path(
    delete,
    path = "/stock/{id}",
    params(("id" = i64, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Stock deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn delete_stock_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.stock.delete(id).await?;
    Ok(Json(MessageResponse::new("Stock deleted")))
}

/// Stock routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock).post(create_stock))
        .route(
            "/:id",
            get(get_stock_item)
                .put(update_stock_item)
                .delete(delete_stock_item),
        )
}
