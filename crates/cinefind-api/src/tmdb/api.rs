//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{SearchMovieParams, SearchMovieResponse};

/// Movie catalog API trait.
///
/// Abstracts the search operation for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches one page of movies matching `params.query`.
    ///
    /// Issues a single request. Failures are returned unchanged; there is
    /// no retry and no partial-result recovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server answers with
    /// a non-success status, or the body cannot be decoded.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<SearchMovieResponse>;
}
