//! # Bookmark Endpoints

use shared::{AddBookmarkRequest, BookmarkListResponse, MessageResponse};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// Saved events of the authenticated user.
pub async fn list_bookmarks(client: &ApiClient) -> ApiResult<BookmarkListResponse> {
    let op = Operation::get("bookmarks.list", "/api/bookmarks");
    client.send(&op).await
}

/// Save an event.
pub async fn add_bookmark(client: &ApiClient, event_id: i64) -> ApiResult<MessageResponse> {
    let req = AddBookmarkRequest { event_id };
    let op = Operation::post("bookmarks.add", "/api/bookmarks").with_body(&req)?;
    client.send(&op).await
}

/// Remove a saved event.
pub async fn remove_bookmark(client: &ApiClient, event_id: i64) -> ApiResult<MessageResponse> {
    let op = Operation::delete("bookmarks.remove", format!("/api/bookmarks/{event_id}"));
    client.send(&op).await
}
