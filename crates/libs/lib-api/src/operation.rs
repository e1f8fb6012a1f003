//! # Operation Descriptors
//!
//! A logical operation ("get event list", "create booking") described as
//! data: method, path, query, body. The descriptor is what the client
//! dispatches and what the cache fingerprints, so the mapping from logical
//! operation to HTTP request lives in exactly one place per endpoint.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Declarative request descriptor for one logical backend operation.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Stable operation identifier, also the cache-key prefix.
    pub name: &'static str,
    pub method: Method,
    /// Path relative to the configured base URL.
    pub path: String,
    pub query: Option<Value>,
    pub body: Option<Value>,
}

impl Operation {
    fn new(name: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            name,
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn get(name: &'static str, path: impl Into<String>) -> Self {
        Self::new(name, Method::GET, path)
    }

    pub fn post(name: &'static str, path: impl Into<String>) -> Self {
        Self::new(name, Method::POST, path)
    }

    pub fn put(name: &'static str, path: impl Into<String>) -> Self {
        Self::new(name, Method::PUT, path)
    }

    pub fn delete(name: &'static str, path: impl Into<String>) -> Self {
        Self::new(name, Method::DELETE, path)
    }

    /// Attach query parameters from a serializable value. Fields that
    /// serialize to `null` should be skipped by the DTO (`skip_serializing_if`).
    pub fn with_query<Q: Serialize>(mut self, query: &Q) -> ApiResult<Self> {
        self.query = Some(to_value(query)?);
        Ok(self)
    }

    /// Attach a JSON request body.
    pub fn with_body<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(to_value(body)?);
        Ok(self)
    }
}

fn to_value<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}
