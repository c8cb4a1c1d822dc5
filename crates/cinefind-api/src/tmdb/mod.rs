//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 `search/movie` endpoint
//! and maps the response body to typed result pages.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use types::{MovieSummary, SearchMovieParams, SearchMovieResponse, TmdbErrorResponse};
