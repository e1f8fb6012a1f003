//! # Backend API Client Library
//!
//! The remote-query layer between UI screens and the backend REST API.
//! Screens never talk HTTP directly; they either subscribe to a cached
//! query or fire a one-shot operation through the [`EventraApi`] facade.
//!
//! ## Module Structure
//!
//! ```text
//! lib-api/
//! ├── lib.rs        - Module exports and documentation
//! ├── error.rs      - ApiError taxonomy (network / http / parse)
//! ├── operation.rs  - Logical operation -> HTTP request descriptors
//! ├── client.rs     - ApiClient: dispatch with bearer attachment
//! ├── cache.rs      - QueryCache: dedup, subscriptions, tag invalidation
//! ├── service.rs    - ApiService trait for dependency injection
//! ├── api.rs        - EventraApi facade wiring pipeline + cache + session
//! └── endpoints/    - One module per backend area
//! ```

pub mod api;
pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod operation;
pub mod service;

// Re-export the surface screens actually touch
pub use api::EventraApi;
pub use cache::{QueryCache, QueryOptions, QueryState, Subscription};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use operation::Operation;
pub use service::ApiService;
