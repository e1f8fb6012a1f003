//! # Authentication Endpoints
//!
//! Login, signup, verification, and password management. Login and signup
//! return the raw [`AuthBody`]; establishing the session from it is the
//! session store's job, not this module's.

use shared::{
    AuthBody, ChangePasswordRequest, LoginRequest, MessageResponse, PasswordResetRequest,
    SignupRequest, VerifyEmailRequest,
};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// Login with email and password.
#[tracing::instrument(skip(client, req), fields(email = %req.email))]
pub async fn login(client: &ApiClient, req: &LoginRequest) -> ApiResult<AuthBody> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let op = Operation::post("auth.login", "/api/auth/login").with_body(req)?;
    let result = client.send::<AuthBody>(&op).await;

    match &result {
        Ok(_) => tracing::info!(duration_ms = start.elapsed().as_millis(), "Login successful"),
        Err(e) => tracing::warn!(error = %e, duration_ms = start.elapsed().as_millis(), "Login failed"),
    }
    result
}

/// Sign up a new user.
#[tracing::instrument(skip(client, req), fields(username = %req.username))]
pub async fn signup(client: &ApiClient, req: &SignupRequest) -> ApiResult<AuthBody> {
    let op = Operation::post("auth.signup", "/api/auth/signup").with_body(req)?;
    client.send(&op).await
}

/// Confirm a signup with the emailed verification code.
pub async fn verify_email(
    client: &ApiClient,
    req: &VerifyEmailRequest,
) -> ApiResult<MessageResponse> {
    let op = Operation::post("auth.verify", "/api/auth/verify").with_body(req)?;
    client.send(&op).await
}

/// Request a password-reset mail.
pub async fn request_password_reset(
    client: &ApiClient,
    req: &PasswordResetRequest,
) -> ApiResult<MessageResponse> {
    let op = Operation::post("auth.password_reset", "/api/auth/password/reset").with_body(req)?;
    client.send(&op).await
}

/// Change the password of the authenticated user.
pub async fn change_password(
    client: &ApiClient,
    req: &ChangePasswordRequest,
) -> ApiResult<MessageResponse> {
    let op = Operation::post("auth.password_change", "/api/auth/password/change").with_body(req)?;
    client.send(&op).await
}
