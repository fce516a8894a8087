use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fabrika API",
        version = "0.1.0",
        description = "Back-office API for a small manufacturing operation: stock inventory, sales orders, invoicing, payments and delivery paperwork. All endpoints except signup/login/password-reset require a bearer token from login."
    ),
    paths(
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::reset_password,
        crate::handlers::stock::list_stock,
        crate::handlers::stock::get_stock_item,
        crate::handlers::stock::create_stock,
        crate::handlers::stock::update_stock_item,
        crate::handlers::stock::delete_stock_item,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::delete_invoice,
        crate::handlers::payments::list_payments,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::update_payment,
        crate::handlers::payments::upload_receipt,
        crate::handlers::payments::delete_payment,
        crate::handlers::receipts::list_receipts,
        crate::handlers::receipts::get_receipt,
        crate::handlers::receipts::create_receipt,
        crate::handlers::receipts::delete_receipt,
        crate::handlers::delivery_notes::list_delivery_notes,
        crate::handlers::delivery_notes::get_delivery_note,
        crate::handlers::delivery_notes::create_delivery_note,
        crate::handlers::delivery_notes::delete_delivery_note,
    ),
    components(schemas(
        crate::auth::SignupRequest,
        crate::auth::LoginRequest,
        crate::auth::LoginResponse,
        crate::auth::ForgotPasswordRequest,
        crate::auth::ForgotPasswordResponse,
        crate::auth::ResetPasswordRequest,
        crate::auth::Role,
        crate::errors::ErrorResponse,
        crate::handlers::common::MessageResponse,
        crate::handlers::stock::CreateStockItemRequest,
        crate::handlers::stock::CreateStockPayload,
        crate::handlers::stock::UpdateStockItemRequest,
        crate::handlers::orders::CreateOrderRequest,
        crate::handlers::orders::UpdateOrderRequest,
        crate::handlers::invoices::CreateInvoiceRequest,
        crate::handlers::payments::CreatePaymentRequest,
        crate::handlers::payments::UpdatePaymentRequest,
        crate::handlers::receipts::CreateReceiptRequest,
        crate::handlers::delivery_notes::CreateDeliveryNoteRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication and password reset"),
        (name = "Stock", description = "Stock inventory"),
        (name = "Orders", description = "Sales orders"),
        (name = "Invoices", description = "Invoices with generated PDFs"),
        (name = "Payments", description = "Payments and receipt uploads"),
        (name = "Receipts", description = "Receipts with generated PDFs"),
        (name = "DeliveryNotes", description = "Delivery notes with generated PDFs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/stock",
            "/orders/{id}",
            "/invoices",
            "/payments/upload",
            "/receipts",
            "/delivery-notes/{id}",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {} in OpenAPI document",
                path
            );
        }
    }
}
