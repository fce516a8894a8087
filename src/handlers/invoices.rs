use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_role, AuthUser, ADMIN_ONLY, SALES_DESK};
use crate::entities::invoice;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    pub order_id: i64,
    pub total_amount: Decimal,
}

/// List all invoices
#[utoipa::path(
    get,
    path = "/invoices",
    responses(
        (status = 200, description = "All invoices"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<invoice::Model>>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let invoices = state.services.invoices.list().await?;
    Ok(Json(ApiResponse::success(invoices)))
}

/// Get one invoice
#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = i64, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<invoice::Model>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let invoice = state.services.invoices.get(id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Create an invoice; the response carries the generated pdf_path
#[utoipa::path(
    post,
    path = "/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created"),
        (status = 400, description = "Missing fields or unknown order", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<invoice::Model>>), ServiceError> {
    require_role(&user, SALES_DESK)?;

    let created = state
        .services
        .invoices
        .create(request.order_id, request.total_amount)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Delete an invoice (refused while payments reference it)
#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    params(("id" = i64, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice deleted", body = MessageResponse),
        (status = 400, description = "Dependent records exist", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.invoices.delete(id).await?;
    Ok(Json(MessageResponse::new("Invoice deleted")))
}

/// Invoice routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice).delete(delete_invoice))
}
