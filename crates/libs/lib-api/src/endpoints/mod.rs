//! # Endpoint Catalog
//!
//! Thin typed wrappers over the backend REST API, one module per area.
//! Each function maps a logical operation to its request descriptor and
//! dispatches it; caching and invalidation live a layer up in
//! [`crate::api::EventraApi`].
//!
//! ```text
//! endpoints/
//! ├── auth.rs       - login, signup, verification, passwords
//! ├── events.rs     - event listing, filtering, organizer CRUD
//! ├── bookings.rs   - bookings and payment-channel initiation
//! ├── bookmarks.rs  - saved events
//! ├── profile.rs    - profile read/update
//! └── lookup.rs     - currency/country/state reference data
//! ```

pub mod auth;
pub mod bookings;
pub mod bookmarks;
pub mod events;
pub mod lookup;
pub mod profile;
