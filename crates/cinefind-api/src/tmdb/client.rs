//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::types::{SearchMovieParams, SearchMovieResponse, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
///
/// Every call is a single attempt: no retry, no caching, no timeout.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends one GET request with Bearer auth and query params, then decodes
    /// the JSON body.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }
}

impl CatalogApi for TmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = params.page))]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<SearchMovieResponse> {
        self.get_json("search/movie", &params.to_query()).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn client_for(mock_server: &wiremock::MockServer, token: &str) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token(token)
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_to_tmdb_base_url() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_parse_search_movie_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        // Act
        let response: SearchMovieResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.total_results, 50);
        assert_eq!(response.results.len(), 2);
        let first = &response.results[0];
        assert_eq!(first.id, 268);
        assert_eq!(first.title, "Batman");
        assert_eq!(first.release_year(), Some(1989));
    }

    #[test]
    fn test_parse_search_movie_empty_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        // Act
        let response: SearchMovieResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.total_results, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_search_movie_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "batman"))
            .and(wiremock::matchers::query_param("page", "2"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .and(wiremock::matchers::query_param("include_adult", "false"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let params = SearchMovieParams::new("batman").page(2);

        // Act
        let response = client.search_movie(&params).await.unwrap();

        // Assert
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].title, "Batman");
    }

    #[tokio::test]
    async fn test_query_is_url_encoded() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("query", "the dark knight & co"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let params = SearchMovieParams::new("the dark knight & co");

        // Act & Assert (mock expect(1) verifies the decoded query value)
        client.search_movie(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "my-secret-token");
        let params = SearchMovieParams::new("test");

        // Act & Assert (mock expect(1) verifies Authorization header)
        client.search_movie(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "invalid-token");
        let params = SearchMovieParams::new("test");

        // Act
        let result = client.search_movie(&params).await;

        // Assert
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let params = SearchMovieParams::new("test");

        // Act
        let err = client.search_movie(&params).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("HTTP 502"));
        assert!(err.contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_rate_limited_response_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let params = SearchMovieParams::new("test");

        // Act
        let result = client.search_movie(&params).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP 429"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{\"page\": 1"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let params = SearchMovieParams::new("test");

        // Act
        let result = client.search_movie(&params).await;

        // Assert
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("failed to decode JSON response"));
    }
}
