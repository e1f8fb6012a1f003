//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the client core and the backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, signup, verification, and password management
//! - [`events`] - Event listing, filtering, and organizer CRUD
//! - [`bookings`] - Ticket booking and payment-channel initiation
//! - [`bookmarks`] - Saved events
//! - [`profile`] - Profile read/update
//! - [`lookup`] - Currency, country, and state reference data
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {
//!   "email": "alice@example.com",
//!   "password": "MyPassword123!"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "role": "user",
//!   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "refresh_token": "d4f1..."
//! }
//! ```

pub mod auth;
pub mod bookings;
pub mod bookmarks;
pub mod events;
pub mod lookup;
pub mod profile;

pub use auth::*;
pub use bookings::*;
pub use bookmarks::*;
pub use events::*;
pub use lookup::*;
pub use profile::*;
