use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A ticket booking for an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub quantity: i32,
    /// Total amount in minor units of `currency`.
    pub amount: i64,
    pub currency: String,
    pub status: BookingStatus,
    /// Backend-issued payment reference, quoted to the gateway.
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// Create-booking request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub event_id: i64,
    pub quantity: i32,
}

/// Booking list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

/// Payment-channel initiation request.
///
/// The backend orchestrates the gateway; the client only opens the returned
/// authorization URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentChannelRequest {
    pub booking_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Payment-channel initiation response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentChannelResponse {
    pub authorization_url: String,
    pub reference: String,
}
