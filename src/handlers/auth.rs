use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};

use crate::auth::{
    AuthUser, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
    ResetPasswordRequest, Role, SignupRequest,
};
use crate::errors::ServiceError;
use crate::handlers::common::{MessageResponse, ValidJson};
use crate::handlers::AppState;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Duplicate email or invalid role", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServiceError> {
    state.auth.signup(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Verify credentials and issue an identity token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let (access_token, user) = state
        .auth
        .login(&request.identifier, &request.password)
        .await?;

    let role = user
        .role
        .parse::<Role>()
        .map_err(|_| ServiceError::InternalError("stored role is invalid".to_string()))?;

    Ok(Json(LoginResponse { access_token, role }))
}

/// Revoke the caller's token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.auth.revoke_token(&user.token_id).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// Issue a password-reset token (delivery is simulated via logs)
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token issued", body = ForgotPasswordResponse),
        (status = 404, description = "Email not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ServiceError> {
    let token = state.auth.forgot_password(&request.email).await?;
    Ok(Json(ForgotPasswordResponse {
        message: "Password reset link sent to email (simulated)".to_string(),
        token,
    }))
}

/// Consume a reset token and set a new password
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state
        .auth
        .reset_password(&request.token, &request.password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}

/// Authentication routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
