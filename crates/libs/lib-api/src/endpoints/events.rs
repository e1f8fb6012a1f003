//! # Event Endpoints
//!
//! Listing/filtering for everyone, CRUD for organizers.

use shared::{CreateEventRequest, Event, EventFilter, EventListResponse, MessageResponse, UpdateEventRequest};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// List published events matching a filter.
#[tracing::instrument(skip(client, filter))]
pub async fn list_events(
    client: &ApiClient,
    filter: &EventFilter,
) -> ApiResult<EventListResponse> {
    let op = Operation::get("events.list", "/api/events").with_query(filter)?;
    client.send(&op).await
}

/// Fetch a single event.
pub async fn get_event(client: &ApiClient, id: i64) -> ApiResult<Event> {
    let op = Operation::get("events.get", format!("/api/events/{id}"));
    client.send(&op).await
}

/// Events organized by the authenticated user.
pub async fn my_events(client: &ApiClient) -> ApiResult<EventListResponse> {
    let op = Operation::get("events.mine", "/api/events/mine");
    client.send(&op).await
}

/// Publish a new event.
#[tracing::instrument(skip(client, req), fields(title = %req.title))]
pub async fn create_event(client: &ApiClient, req: &CreateEventRequest) -> ApiResult<Event> {
    let op = Operation::post("events.create", "/api/events").with_body(req)?;
    client.send(&op).await
}

/// Update an event owned by the authenticated organizer.
pub async fn update_event(
    client: &ApiClient,
    id: i64,
    req: &UpdateEventRequest,
) -> ApiResult<Event> {
    let op = Operation::put("events.update", format!("/api/events/{id}")).with_body(req)?;
    client.send(&op).await
}

/// Delete an event owned by the authenticated organizer.
pub async fn delete_event(client: &ApiClient, id: i64) -> ApiResult<MessageResponse> {
    let op = Operation::delete("events.delete", format!("/api/events/{id}"));
    client.send(&op).await
}
