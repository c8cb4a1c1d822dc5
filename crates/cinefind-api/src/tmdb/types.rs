//! TMDB API response types and search parameters.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Base URL of the TMDB image CDN.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Base URL of the TMDB movie web pages.
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie/";

// --- Search Movie ---

/// Response from `search/movie` endpoint.
///
/// The page object is the top-level body; results are not nested
/// under another key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchMovieResponse {
    /// Current page number.
    pub page: u32,
    /// Search results.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single movie search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, empty string or null when unknown).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieSummary {
    /// Parses `release_date` and returns its year.
    ///
    /// Returns `None` when the date is missing, empty, or malformed.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Full poster URL for the given image size (e.g. `w500`).
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE_URL}{size}{path}"))
    }

    /// Full backdrop URL for the given image size (e.g. `original`).
    #[must_use]
    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE_URL}{size}{path}"))
    }

    /// TMDB web page for this movie.
    #[must_use]
    pub fn tmdb_url(&self) -> String {
        format!("{MOVIE_PAGE_BASE_URL}{}", self.id)
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- Search Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-based, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets whether adult titles are included.
    #[must_use]
    pub const fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    /// Query pairs sent to the endpoint.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("language", self.language.clone()),
            ("include_adult", self.include_adult.to_string()),
        ]
    }
}
