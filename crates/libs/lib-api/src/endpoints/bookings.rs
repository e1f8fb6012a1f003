//! # Booking Endpoints
//!
//! Ticket bookings and payment-channel initiation. The backend owns
//! booking/payment orchestration; the client only opens the returned
//! authorization URL.

use shared::{
    Booking, BookingListResponse, CreateBookingRequest, PaymentChannelRequest,
    PaymentChannelResponse,
};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// Book tickets for an event.
#[tracing::instrument(skip(client, req), fields(event_id = req.event_id, quantity = req.quantity))]
pub async fn create_booking(client: &ApiClient, req: &CreateBookingRequest) -> ApiResult<Booking> {
    let op = Operation::post("bookings.create", "/api/bookings").with_body(req)?;
    client.send(&op).await
}

/// Bookings of the authenticated user.
pub async fn my_bookings(client: &ApiClient) -> ApiResult<BookingListResponse> {
    let op = Operation::get("bookings.mine", "/api/bookings");
    client.send(&op).await
}

/// Open a payment channel for a pending booking.
#[tracing::instrument(skip(client, req), fields(booking_id = req.booking_id))]
pub async fn init_payment_channel(
    client: &ApiClient,
    req: &PaymentChannelRequest,
) -> ApiResult<PaymentChannelResponse> {
    let op = Operation::post(
        "bookings.payment",
        format!("/api/bookings/{}/payment", req.booking_id),
    )
    .with_body(req)?;
    client.send(&op).await
}
