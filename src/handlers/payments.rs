use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_role, AuthUser, ADMIN_ONLY, SALES_DESK};
use crate::entities::payment;
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;
use crate::services::payments::{NewPayment, PaymentPatch};
use crate::ApiResponse;

const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "gif"];

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub invoice_id: i64,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount: Option<Decimal>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// List all payments
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "All payments"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<payment::Model>>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let payments = state.services.payments.list().await?;
    Ok(Json(ApiResponse::success(payments)))
}

/// Get one payment
#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<payment::Model>>, ServiceError> {
    require_role(&user, SALES_DESK)?;
    let payment = state.services.payments.get(id).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Record a payment against an invoice
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded"),
        (status = 400, description = "Missing fields or unknown invoice", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<payment::Model>>), ServiceError> {
    require_role(&user, SALES_DESK)?;

    let created = state
        .services
        .payments
        .create(NewPayment {
            invoice_id: request.invoice_id,
            amount: request.amount,
            payment_method: request.payment_method,
            status: request.status,
            reference: request.reference,
            notes: request.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Partially update a payment
#[utoipa::path(
    put,
    path = "/payments/{id}",
    params(("id" = i64, Path, description = "Payment id")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
    ValidJson(request): ValidJson<UpdatePaymentRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, SALES_DESK)?;

    let patch = PaymentPatch {
        amount: request.amount,
        payment_method: request.payment_method,
        status: request.status,
        reference: request.reference,
        notes: request.notes,
    };
    state.services.payments.update(id, patch).await?;
    Ok(Json(MessageResponse::new("Payment updated")))
}

/// Upload a scanned receipt for a payment (multipart: `file`, `payment_id`)
#[utoipa::path(
    post,
    path = "/payments/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "file + payment_id"),
    responses(
        (status = 200, description = "Receipt stored"),
        (status = 400, description = "Missing field, unknown payment, bad type or oversize", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn upload_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<payment::Model>>, ServiceError> {
    require_role(&user, SALES_DESK)?;

    let mut payment_id: Option<i64> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?
    {
        match field.name().unwrap_or("") {
            "payment_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
                let parsed = text.trim().parse().map_err(|_| {
                    ServiceError::ValidationError("payment_id must be an integer".to_string())
                })?;
                payment_id = Some(parsed);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let payment_id = payment_id.ok_or_else(|| {
        ServiceError::ValidationError("payment_id field is required".to_string())
    })?;
    let (file_name, bytes) =
        file.ok_or_else(|| ServiceError::ValidationError("file field is required".to_string()))?;

    let extension = allowed_extension(&file_name)?;
    if bytes.len() as u64 > state.config.upload_max_bytes {
        return Err(ServiceError::ValidationError(
            "file exceeds the upload size limit".to_string(),
        ));
    }

    let updated = state
        .services
        .payments
        .attach_receipt(payment_id, &extension, &bytes)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a payment (refused while receipts reference it)
#[utoipa::path(
    delete,
    path = "/payments/{id}",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment deleted", body = MessageResponse),
        (status = 400, description = "Dependent records exist", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    require_role(&user, ADMIN_ONLY)?;
    state.services.payments.delete(id).await?;
    Ok(Json(MessageResponse::new("Payment deleted")))
}

fn allowed_extension(file_name: &str) -> Result<String, ServiceError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());
    match extension {
        Some(extension) if ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) => {
            Ok(extension)
        }
        _ => Err(ServiceError::ValidationError(
            "file type not allowed; use png, jpg, jpeg, pdf or gif".to_string(),
        )),
    }
}

/// Payment routes. The upload route gets a raised body limit to make room
/// for the 5 MB file plus multipart framing.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route(
            "/upload",
            post(upload_receipt).layer(DefaultBodyLimit::max(6 * 1024 * 1024)),
        )
        .route(
            "/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_checked_case_insensitively() {
        assert_eq!(allowed_extension("scan.PDF").unwrap(), "pdf");
        assert_eq!(allowed_extension("receipt.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn disallowed_and_missing_extensions_are_rejected() {
        assert!(allowed_extension("receipt.exe").is_err());
        assert!(allowed_extension("no-extension").is_err());
        assert!(allowed_extension("").is_err());
    }
}
