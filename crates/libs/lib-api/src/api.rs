//! # EventraApi Facade
//!
//! Wires the request pipeline, response cache, and session store into the
//! one object screens hold. Reads go through `watch_*` subscriptions
//! (cached, deduplicated, tag-invalidated); writes go through the
//! [`ApiService`] operations and invalidate the tags they touch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use shared::{
    Booking, ChangePasswordRequest, CreateBookingRequest, CreateEventRequest, Event, EventFilter,
    LoginRequest, MessageResponse, PasswordResetRequest, PaymentChannelRequest,
    PaymentChannelResponse, Profile, SignupRequest, UpdateEventRequest, UpdateProfileRequest,
    VerifyEmailRequest,
};

use lib_core::config::Config;
use lib_core::session::SessionStore;
use shared::AuthBody;

use crate::cache::{Fetcher, QueryCache, QueryOptions, Subscription};
use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::service::ApiService;

/// Invalidation tags, one per cached collection.
pub const TAG_EVENTS: &str = "events";
pub const TAG_MY_EVENTS: &str = "my-events";
pub const TAG_BOOKINGS: &str = "bookings";
pub const TAG_BOOKMARKS: &str = "bookmarks";
pub const TAG_PROFILE: &str = "profile";

/// How long lookup reference data stays fresh; it changes on the order of
/// deployments, not user actions.
const LOOKUP_STALE_AFTER: Duration = Duration::from_secs(3600);

/// The client core's public surface.
pub struct EventraApi {
    client: Arc<ApiClient>,
    cache: QueryCache,
    session: Arc<SessionStore>,
}

impl EventraApi {
    /// Build the facade over an existing session store.
    ///
    /// The store is shared with the expiry monitor and whatever else
    /// observes authentication state; this facade never owns it.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Self {
        let client = Arc::new(ApiClient::new(config, session.subscribe()));
        let cache = QueryCache::new(Duration::from_secs(config.cache_grace_secs));
        Self {
            client,
            cache,
            session,
        }
    }

    /// The underlying cache (diagnostics and tests).
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn establish_session(&self, body: &AuthBody) -> ApiResult<()> {
        // a malformed credential aborts the flow as a generic authentication
        // failure; any prior session is preserved by the store
        self.session
            .set_session(body)
            .map_err(|e| ApiError::Parse(format!("authentication response rejected: {e}")))
    }

    fn fetcher<T, F, Fut>(&self, call: F) -> Fetcher
    where
        T: Serialize,
        F: Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ApiResult<T>> + Send + 'static,
    {
        let client = self.client.clone();
        Arc::new(move || {
            let fut = call(client.clone());
            Box::pin(async move { fut.await.and_then(to_cache_value) })
        })
    }

    // region:    --- Cached queries

    /// Subscribe to the filtered event list.
    pub fn watch_events(&self, filter: &EventFilter) -> Subscription {
        let f = filter.clone();
        self.cache.query(
            "events.list",
            filter,
            &QueryOptions::tagged(&[TAG_EVENTS]),
            self.fetcher(move |client| {
                let filter = f.clone();
                async move { endpoints::events::list_events(&client, &filter).await }
            }),
        )
    }

    /// Subscribe to a single event.
    pub fn watch_event(&self, id: i64) -> Subscription {
        self.cache.query(
            "events.get",
            &id,
            &QueryOptions::tagged(&[TAG_EVENTS]),
            self.fetcher(move |client| async move { endpoints::events::get_event(&client, id).await }),
        )
    }

    /// Subscribe to the authenticated organizer's events.
    pub fn watch_my_events(&self) -> Subscription {
        self.cache.query(
            "events.mine",
            &(),
            &QueryOptions::tagged(&[TAG_EVENTS, TAG_MY_EVENTS]),
            self.fetcher(|client| async move { endpoints::events::my_events(&client).await }),
        )
    }

    /// Subscribe to the authenticated user's bookings.
    pub fn watch_my_bookings(&self) -> Subscription {
        self.cache.query(
            "bookings.mine",
            &(),
            &QueryOptions::tagged(&[TAG_BOOKINGS]),
            self.fetcher(|client| async move { endpoints::bookings::my_bookings(&client).await }),
        )
    }

    /// Subscribe to the authenticated user's saved events.
    pub fn watch_bookmarks(&self) -> Subscription {
        self.cache.query(
            "bookmarks.list",
            &(),
            &QueryOptions::tagged(&[TAG_BOOKMARKS]),
            self.fetcher(|client| async move { endpoints::bookmarks::list_bookmarks(&client).await }),
        )
    }

    /// Subscribe to the authenticated user's profile.
    pub fn watch_profile(&self) -> Subscription {
        self.cache.query(
            "profile.get",
            &(),
            &QueryOptions::tagged(&[TAG_PROFILE]),
            self.fetcher(|client| async move { endpoints::profile::get_profile(&client).await }),
        )
    }

    /// Subscribe to the supported currencies.
    pub fn watch_currencies(&self) -> Subscription {
        self.cache.query(
            "lookup.currencies",
            &(),
            &QueryOptions::default().stale_after(LOOKUP_STALE_AFTER),
            self.fetcher(|client| async move { endpoints::lookup::currencies(&client).await }),
        )
    }

    /// Subscribe to the available countries.
    pub fn watch_countries(&self) -> Subscription {
        self.cache.query(
            "lookup.countries",
            &(),
            &QueryOptions::default().stale_after(LOOKUP_STALE_AFTER),
            self.fetcher(|client| async move { endpoints::lookup::countries(&client).await }),
        )
    }

    /// Subscribe to the states of a country.
    pub fn watch_states(&self, country_code: &str) -> Subscription {
        let code = country_code.to_string();
        let fetch_code = code.clone();
        self.cache.query(
            "lookup.states",
            &code,
            &QueryOptions::default().stale_after(LOOKUP_STALE_AFTER),
            self.fetcher(move |client| {
                let code = fetch_code.clone();
                async move { endpoints::lookup::states(&client, &code).await }
            }),
        )
    }

    // endregion: --- Cached queries
}

fn to_cache_value<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl ApiService for EventraApi {
    async fn login(&self, req: &LoginRequest) -> ApiResult<()> {
        let body = endpoints::auth::login(&self.client, req).await?;
        self.establish_session(&body)
    }

    async fn signup(&self, req: &SignupRequest) -> ApiResult<()> {
        let body = endpoints::auth::signup(&self.client, req).await?;
        self.establish_session(&body)
    }

    fn logout(&self) {
        self.session.clear_session();
    }

    async fn verify_email(&self, req: &VerifyEmailRequest) -> ApiResult<MessageResponse> {
        endpoints::auth::verify_email(&self.client, req).await
    }

    async fn request_password_reset(
        &self,
        req: &PasswordResetRequest,
    ) -> ApiResult<MessageResponse> {
        endpoints::auth::request_password_reset(&self.client, req).await
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> ApiResult<MessageResponse> {
        endpoints::auth::change_password(&self.client, req).await
    }

    async fn create_event(&self, req: &CreateEventRequest) -> ApiResult<Event> {
        self.cache
            .mutate(
                &[TAG_EVENTS, TAG_MY_EVENTS],
                endpoints::events::create_event(&self.client, req),
            )
            .await
    }

    async fn update_event(&self, id: i64, req: &UpdateEventRequest) -> ApiResult<Event> {
        self.cache
            .mutate(
                &[TAG_EVENTS, TAG_MY_EVENTS],
                endpoints::events::update_event(&self.client, id, req),
            )
            .await
    }

    async fn delete_event(&self, id: i64) -> ApiResult<MessageResponse> {
        self.cache
            .mutate(
                &[TAG_EVENTS, TAG_MY_EVENTS],
                endpoints::events::delete_event(&self.client, id),
            )
            .await
    }

    async fn create_booking(&self, req: &CreateBookingRequest) -> ApiResult<Booking> {
        // a fresh booking changes seat availability too, so the event list
        // refetches alongside the booking list
        self.cache
            .mutate(
                &[TAG_BOOKINGS, TAG_EVENTS],
                endpoints::bookings::create_booking(&self.client, req),
            )
            .await
    }

    async fn init_payment_channel(
        &self,
        req: &PaymentChannelRequest,
    ) -> ApiResult<PaymentChannelResponse> {
        endpoints::bookings::init_payment_channel(&self.client, req).await
    }

    async fn add_bookmark(&self, event_id: i64) -> ApiResult<MessageResponse> {
        self.cache
            .mutate(
                &[TAG_BOOKMARKS],
                endpoints::bookmarks::add_bookmark(&self.client, event_id),
            )
            .await
    }

    async fn remove_bookmark(&self, event_id: i64) -> ApiResult<MessageResponse> {
        self.cache
            .mutate(
                &[TAG_BOOKMARKS],
                endpoints::bookmarks::remove_bookmark(&self.client, event_id),
            )
            .await
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> ApiResult<Profile> {
        self.cache
            .mutate(
                &[TAG_PROFILE],
                endpoints::profile::update_profile(&self.client, req),
            )
            .await
    }
}
