//! HTTP client for Leadline backend requests.
//!
//! This module provides a low-level HTTP wrapper for making requests to the
//! Leadline REST API, handling authentication, query parameters, and response
//! parsing into wire models.

use crate::api::error::ApiError;
use anyhow::Result;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

/// Makes requests to the backend and parses responses into wire models.
///
pub(crate) struct Client {
    access_token: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given access token and base URL.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as `reqwest::Client::builder().build()` only fails on
    /// invalid configuration, which we don't use.
    pub fn new(access_token: &str, base_url: &str) -> Self {
        Client {
            access_token: access_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Make a request and return the raw response or a transport error.
    ///
    pub(crate) async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self
            .http_client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", &self.access_token));
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }

    /// GET a path and parse the JSON body into the given wire model.
    ///
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.call(Method::GET, path, params, None).await?;
        Self::parse(response).await
    }

    /// Send a request with a JSON body and parse the JSON response.
    ///
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let response = self.call(method, path, &[], Some(body)).await?;
        Self::parse(response).await
    }

    /// Check the response status, then deserialize the body.
    ///
    pub(crate) async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            log::error!("API request failed with status {}: {}", status, message);
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(model) => Ok(model),
            Err(e) => {
                log::error!(
                    "Failed to deserialize API response: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&bytes)
                );
                Err(ApiError::Deserialization(e).into())
            }
        }
    }

    /// Extract a human-readable message from an error response body.
    ///
    pub(crate) async fn error_message(response: Response) -> String {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
                .unwrap_or(text),
            Err(_) => text,
        }
    }
}
