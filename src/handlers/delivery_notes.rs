use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_role, AuthUser, ADMIN_ONLY, WAREHOUSE_DESK};
use crate::entities::delivery_note;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDeliveryNoteRequest {
    pub order_id: i64,
}

/// List all delivery notes
#[utoipa::path(
    get,
    path = "/delivery-notes",
    responses(
        (status = 200, description = "All delivery notes"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "DeliveryNotes"
)]
pub async fn list_delivery_notes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<delivery_note::Model>>>, ServiceError> {
    require_role(&user, WAREHOUSE_DESK)?;
    let notes = state.services.delivery_notes.list().await?;
    Ok(Json(ApiResponse::success(notes)))
}

/// Get one delivery note
#[utoipa::path(
    get,
    path = "/delivery-notes/{id}",
    params(("id" = i64, Path, description = "Delivery note id")),
    responses(
        (status = 200, description = "Delivery note"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "DeliveryNotes"
)]
pub async fn get_delivery_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<delivery_note::Model>>, ServiceError> {
    require_role(&user, WAREHOUSE_DESK)?;
    let note = state.services.delivery_notes.get(id).await?;
    Ok(Json(ApiResponse::success(note)))
}

/// Generate a delivery note; the response carries the generated pdf_path
#[utoipa::path(
    post,
    path = "/delivery-notes",
    request_body = CreateDeliveryNoteRequest,
    responses(
        (status = 201, description = "Delivery note generated"),
        (status = 400, description = "Missing fields or unknown order", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "DeliveryNotes"
)]
pub async fn create_delivery_note(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<CreateDeliveryNoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<delivery_note::Model>>), ServiceError> {
    require_role(&user, WAREHOUSE_DESK)?;

    let created = state
        .services
        .delivery_notes
        .create(request.order_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Delete a delivery note
#[utoipa::path(
    delete,
    path = "/delivery-notes/{id}",
    params(("id" = i64, Path, description = "Delivery note id")),
    responses(
        (status = 200, description = "Delivery note deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "DeliveryNotes"
)]
pub async fn delete_delivery_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.delivery_notes.delete(id).await?;
    Ok(Json(MessageResponse::new("Delivery note deleted")))
}

/// Delivery note routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_delivery_notes).post(create_delivery_note))
        .route("/:id", get(get_delivery_note).delete(delete_delivery_note))
}
