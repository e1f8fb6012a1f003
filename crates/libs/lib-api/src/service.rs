//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and
//! modularity: screens depend on [`ApiService`] and tests substitute a
//! mock instead of a live backend.
//!
//! The trait covers the one-shot operations (auth flows and mutations).
//! Cached subscriptions are inherent methods on
//! [`EventraApi`](crate::api::EventraApi) because a subscription handle is
//! concrete by nature — mock the data underneath, not the handle.

use async_trait::async_trait;
use shared::{
    Booking, ChangePasswordRequest, CreateBookingRequest, CreateEventRequest, Event, LoginRequest,
    MessageResponse, PasswordResetRequest, PaymentChannelRequest, PaymentChannelResponse, Profile,
    SignupRequest, UpdateEventRequest, UpdateProfileRequest, VerifyEmailRequest,
};

use crate::error::ApiResult;

/// One-shot backend operations.
///
/// Implemented by [`EventraApi`](crate::api::EventraApi); mock it in screen
/// tests to drive every state a flow can reach.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Login and establish the session on success
    async fn login(&self, req: &LoginRequest) -> ApiResult<()>;

    /// Sign up a new account and establish the session on success
    async fn signup(&self, req: &SignupRequest) -> ApiResult<()>;

    /// Drop the session (local only; the backend keeps no session state)
    fn logout(&self);

    /// Confirm a signup with the emailed verification code
    async fn verify_email(&self, req: &VerifyEmailRequest) -> ApiResult<MessageResponse>;

    /// Request a password-reset mail
    async fn request_password_reset(
        &self,
        req: &PasswordResetRequest,
    ) -> ApiResult<MessageResponse>;

    /// Change the authenticated user's password
    async fn change_password(&self, req: &ChangePasswordRequest) -> ApiResult<MessageResponse>;

    /// Publish a new event
    async fn create_event(&self, req: &CreateEventRequest) -> ApiResult<Event>;

    /// Update an owned event
    async fn update_event(&self, id: i64, req: &UpdateEventRequest) -> ApiResult<Event>;

    /// Delete an owned event
    async fn delete_event(&self, id: i64) -> ApiResult<MessageResponse>;

    /// Book tickets for an event
    async fn create_booking(&self, req: &CreateBookingRequest) -> ApiResult<Booking>;

    /// Open a payment channel for a pending booking
    async fn init_payment_channel(
        &self,
        req: &PaymentChannelRequest,
    ) -> ApiResult<PaymentChannelResponse>;

    /// Save an event
    async fn add_bookmark(&self, event_id: i64) -> ApiResult<MessageResponse>;

    /// Remove a saved event
    async fn remove_bookmark(&self, event_id: i64) -> ApiResult<MessageResponse>;

    /// Update the authenticated user's profile
    async fn update_profile(&self, req: &UpdateProfileRequest) -> ApiResult<Profile>;
}
