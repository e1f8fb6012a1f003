//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the client core and the backend
//! REST API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Authentication and account management DTOs
//!   - **[`dto::events`]**: Event listing, filtering, and CRUD DTOs
//!   - **[`dto::bookings`]**: Booking and payment-channel DTOs
//!   - **[`dto::bookmarks`]**: Bookmark DTOs
//!   - **[`dto::profile`]**: Profile read/update DTOs
//!   - **[`dto::lookup`]**: Currency/country/state lookup DTOs
//!
//! ## Wire Format
//!
//! - Field names use **snake_case** in Rust, which maps to **snake_case** in
//!   JSON by default
//! - Optional fields are omitted from JSON when `None` (using
//!   `#[serde(skip_serializing_if = "Option::is_none")]`)
//! - Timestamps are RFC3339 strings via `chrono::DateTime<Utc>`
//! - All structs implement both `Serialize` and `Deserialize` for
//!   bidirectional communication

pub mod dto;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
