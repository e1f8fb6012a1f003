use serde::{Deserialize, Serialize};

use super::events::Event;

/// Add-bookmark request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddBookmarkRequest {
    pub event_id: i64,
}

/// Bookmark list response.
///
/// The backend resolves bookmarks to full events so the saved-events screen
/// renders without a second round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkListResponse {
    pub events: Vec<Event>,
}
