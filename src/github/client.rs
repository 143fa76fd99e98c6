//! HTTP client shared foundation for the GitHub API
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout, User-Agent and API base URL
//! - Bearer authentication and GitHub media type headers
//! - Rate limit and status error mapping
//!
//! Requests are one-shot; failures are reported to the caller without retrying.

use crate::error::ForgeError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("orgbump/", env!("CARGO_PKG_VERSION"));

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST prefix used by GitHub Enterprise Server
const ENTERPRISE_REST_SUFFIX: &str = "/api/v3";

/// GraphQL endpoint belonging to a REST base URL
///
/// Enterprise Server serves REST under `/api/v3` and GraphQL under `/api/graphql`;
/// everywhere else GraphQL is `/graphql` below the REST base.
pub fn graphql_url(api_url: &str) -> String {
    let api_url = api_url.trim_end_matches('/');
    match api_url.strip_suffix(ENTERPRISE_REST_SUFFIX) {
        Some(host) => format!("{}/api/graphql", host),
        None => format!("{}/graphql", api_url),
    }
}

/// GraphQL request body
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Authenticated GitHub HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    api_url: String,
    graphql_url: String,
    token: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(api_url: &str, token: &str) -> Result<Self, ForgeError> {
        Self::with_config(api_url, token, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(
        api_url: &str,
        token: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ForgeError::network("HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            graphql_url: graphql_url(api_url),
            token: token.to_string(),
        })
    }

    /// Base API URL without trailing slash
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build an endpoint URL with query parameters
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ForgeError> {
        let mut url = Url::parse(&format!("{}{}", self.api_url, path))
            .map_err(|e| ForgeError::network(path, format!("invalid URL: {}", e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    /// GraphQL endpoint derived from the API base URL
    pub fn graphql_endpoint(&self) -> Result<Url, ForgeError> {
        Url::parse(&self.graphql_url)
            .map_err(|e| ForgeError::network("/graphql", format!("invalid URL: {}", e)))
    }

    /// Perform a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ForgeError> {
        let url = self.endpoint(path, query)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Self::send_error(path, e))?;

        let response = Self::check_status(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ForgeError::invalid_response(path, format!("failed to parse JSON: {}", e)))
    }

    /// Execute a GraphQL operation and return its `data`
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ForgeError> {
        const PATH: &str = "/graphql";
        let url = self.graphql_endpoint()?;
        let body = GraphQlRequest { query, variables };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::send_error(PATH, e))?;

        let response = Self::check_status(PATH, response).await?;
        let envelope: GraphQlResponse<T> = response.json().await.map_err(|e| {
            ForgeError::invalid_response(PATH, format!("failed to parse JSON: {}", e))
        })?;

        Self::into_data(envelope)
    }

    fn into_data<T>(envelope: GraphQlResponse<T>) -> Result<T, ForgeError> {
        if !envelope.errors.is_empty() {
            return Err(ForgeError::GraphQl {
                messages: envelope.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        envelope
            .data
            .ok_or_else(|| ForgeError::invalid_response("/graphql", "response has no data"))
    }

    fn send_error(path: &str, e: reqwest::Error) -> ForgeError {
        if e.is_timeout() {
            ForgeError::network(path, "request timed out")
        } else {
            ForgeError::network(path, e.to_string())
        }
    }

    async fn check_status(path: &str, response: Response) -> Result<Response, ForgeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");
        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted)
        {
            return Err(ForgeError::RateLimited {
                endpoint: path.to_string(),
            });
        }

        let message = response.text().await.unwrap_or_default();
        Err(ForgeError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
