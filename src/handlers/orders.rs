use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_role, AuthUser, ADMIN_ONLY, SALES_DESK};
use crate::entities::order;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::services::orders::{NewOrder, OrderPatch};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    /// Defaults to "pending"
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
}

/// List all orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<order::Model>>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let orders = state.services.orders.list().await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get one order
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<order::Model>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let order = state.services.orders.get(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Create an order
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Missing customer name", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<order::Model>>), ServiceError> {
    require_role(&user, SALES_DESK)?;

    let created = state
        .services
        .orders
        .create(NewOrder {
            customer_name: request.customer_name,
            status: request.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Partially update an order
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
    ValidJson(request): ValidJson<UpdateOrderRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, SALES_DESK)?;

    let patch = OrderPatch {
        customer_name: request.customer_name,
        status: request.status,
    };
    state.services.orders.update(id, patch).await?;
    Ok(Json(MessageResponse::new("Order updated")))
}

/// Delete an order (refused while invoices or delivery notes reference it)
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, description = "Dependent records exist", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.orders.delete(id).await?;
    Ok(Json(MessageResponse::new("Order deleted")))
}

/// Order routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
}
