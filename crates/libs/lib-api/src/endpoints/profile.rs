//! # Profile Endpoints

use shared::{Profile, UpdateProfileRequest};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// Profile of the authenticated user.
pub async fn get_profile(client: &ApiClient) -> ApiResult<Profile> {
    let op = Operation::get("profile.get", "/api/profile");
    client.send(&op).await
}

/// Update the authenticated user's profile.
pub async fn update_profile(
    client: &ApiClient,
    req: &UpdateProfileRequest,
) -> ApiResult<Profile> {
    let op = Operation::put("profile.update", "/api/profile").with_body(req)?;
    client.send(&op).await
}
