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
use crate::entities::receipt;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReceiptRequest {
    pub payment_id: i64,
}

/// List all receipts
#[utoipa::path(
    get,
    path = "/receipts",
    responses(
        (status = 200, description = "All receipts"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn list_receipts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<receipt::Model>>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let receipts = state.services.receipts.list().await?;
    Ok(Json(ApiResponse::success(receipts)))
}

/// Get one receipt
#[utoipa::path(
    get,
    path = "/receipts/{id}",
    params(("id" = i64, Path, description = "Receipt id")),
    responses(
        (status = 200, description = "Receipt"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<receipt::Model>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let receipt = state.services.receipts.get(id).await?;
    Ok(Json(ApiResponse::success(receipt)))
}

/// Generate a receipt; the response carries the generated pdf_path
#[utoipa::path(
    post,
    path = "/receipts",
    request_body = CreateReceiptRequest,
    responses(
        (status = 201, description = "Receipt generated"),
        (status = 400, description = "Missing fields or unknown payment", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn create_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<ApiResponse<receipt::Model>>), ServiceError> {
    require_role(&user, SALES_DESK)?;

    let created = state.services.receipts.create(request.payment_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Delete a receipt
#[utoipa::path(
    delete,
    path = "/receipts/{id}",
    params(("id" = i64, Path, description = "Receipt id")),
    responses(
        (status = 200, description = "Receipt deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.receipts.delete(id).await?;
    Ok(Json(MessageResponse::new("Receipt deleted")))
}

/// Receipt routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_receipts).post(create_receipt))
        .route("/:id", get(get_receipt).delete(delete_receipt))
}
