//! # API Client
//!
//! HTTP dispatch for operation descriptors. The client reads the current
//! session at dispatch time — never at construction — so a token refreshed
//! or cleared between two calls to the same operation is always reflected
//! by the second call.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use lib_core::config::Config;
use lib_core::session::Session;

use crate::error::{ApiError, ApiResult};
use crate::operation::Operation;

/// HTTP client for the backend API server.
///
/// Maintains a connection pool; cheap to share behind an `Arc`.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: watch::Receiver<Option<Session>>,
}

impl ApiClient {
    /// Create a client from config and a session subscription.
    ///
    /// The request timeout comes from config to prevent screens freezing on
    /// a dead backend.
    pub fn new(config: &Config, session: watch::Receiver<Option<Session>>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build the outgoing request for an operation.
    ///
    /// The bearer credential is attached if and only if a session exists at
    /// this moment; an unauthenticated request carries no `Authorization`
    /// header at all.
    pub(crate) fn build_request(&self, op: &Operation) -> reqwest::RequestBuilder {
        let mut req = self.http.request(op.method.clone(), self.url(&op.path));

        if let Some(query) = &op.query {
            req = req.query(query);
        }
        if let Some(body) = &op.body {
            req = req.json(body);
        }
        if let Some(session) = self.session.borrow().as_ref() {
            req = req.bearer_auth(&session.access_token);
        }

        req
    }

    /// Dispatch an operation and deserialize a 2xx JSON response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when no response arrives
    /// - [`ApiError::Http`] for a non-2xx status, body carried verbatim
    /// - [`ApiError::Parse`] when the 2xx body fails to deserialize
    pub async fn send<T: DeserializeOwned>(&self, op: &Operation) -> ApiResult<T> {
        let response = self
            .build_request(op)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            api_base_url: "http://127.0.0.1:3001/".to_string(),
            data_dir: PathBuf::from("data"),
            request_timeout_secs: 10,
            expiry_check_interval_secs: 30,
            expiry_window_secs: 300,
            cache_grace_secs: 30,
        }
    }

    fn session() -> Session {
        Session {
            username: "alice".to_string(),
            role: "user".to_string(),
            access_token: "h.c.s".to_string(),
            refresh_token: "r1".to_string(),
            exp: 1_999_999_999,
            sub: 42,
        }
    }

    #[test]
    fn test_request_without_session_has_no_authorization_header() {
        let (_tx, rx) = watch::channel(None);
        let client = ApiClient::new(&test_config(), rx);

        let op = Operation::get("events.list", "/api/events");
        let req = client.build_request(&op).build().unwrap();

        assert!(req.headers().get("authorization").is_none());
        assert_eq!(req.url().as_str(), "http://127.0.0.1:3001/api/events");
    }

    #[test]
    fn test_request_with_session_carries_bearer_token() {
        let (_tx, rx) = watch::channel(Some(session()));
        let client = ApiClient::new(&test_config(), rx);

        let op = Operation::get("profile.get", "/api/profile");
        let req = client.build_request(&op).build().unwrap();

        let header = req.headers().get("authorization").expect("bearer header");
        assert_eq!(header.to_str().unwrap(), "Bearer h.c.s");
    }

    #[test]
    fn test_credential_is_read_at_dispatch_time() {
        let (tx, rx) = watch::channel(Some(session()));
        let client = ApiClient::new(&test_config(), rx);
        let op = Operation::get("profile.get", "/api/profile");

        // session cleared between two dispatches of the same operation
        tx.send_replace(None);
        let req = client.build_request(&op).build().unwrap();
        assert!(req.headers().get("authorization").is_none());

        let mut refreshed = session();
        refreshed.access_token = "h2.c2.s2".to_string();
        tx.send_replace(Some(refreshed));
        let req = client.build_request(&op).build().unwrap();
        assert_eq!(
            req.headers().get("authorization").unwrap().to_str().unwrap(),
            "Bearer h2.c2.s2"
        );
    }

    #[test]
    fn test_query_parameters_are_serialized() {
        let (_tx, rx) = watch::channel(None);
        let client = ApiClient::new(&test_config(), rx);

        let filter = shared::EventFilter {
            city: Some("Lagos".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let op = Operation::get("events.list", "/api/events")
            .with_query(&filter)
            .unwrap();
        let req = client.build_request(&op).build().unwrap();

        let url = req.url().as_str();
        assert!(url.contains("city=Lagos"));
        assert!(url.contains("page=2"));
        assert!(!url.contains("country"));
    }
}
