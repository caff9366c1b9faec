//! JSON over HTTP helpers.

use crate::error::Result;
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client configuration.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Scheme and host of the server, e.g. `https://notes.example.com`.
    pub origin: String,

    /// Request timeout.
    /// Default: 30s
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// `<protocol>//<host>` of the configured server, without a trailing slash.
pub fn host_url(config: &HttpConfig) -> String {
    config.origin.trim_end_matches('/').to_string()
}

/// Decode a response body as JSON.
pub fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(response.json()?)
}

/// A client that posts JSON to one origin and keeps its cookies.
#[derive(Clone, Debug)]
pub struct JsonClient {
    client: Client,
    origin: String,
}

impl JsonClient {
    /// Create a client with a cookie store for the configured origin.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            origin: host_url(config),
        })
    }

    /// Absolute URL for a route.
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.origin, route)
    }

    /// Build (but do not send) a JSON POST.
    pub fn build_post<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> Result<Request> {
        let request = self
            .client
            .post(self.url(route))
            .header(ACCEPT, "application/json")
            .json(body)
            .build()?;
        Ok(request)
    }

    /// POST `body` as JSON to `<origin><route>`.
    ///
    /// The response is returned whatever its status.
    pub fn post_json<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> Result<Response> {
        let request = self.build_post(route, body)?;
        Ok(self.client.execute(request)?)
    }
}
