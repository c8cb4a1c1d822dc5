//! Catalog client library for cinefind.
//!
//! Provides the TMDB movie search client.

/// TMDB API client.
pub mod tmdb;
