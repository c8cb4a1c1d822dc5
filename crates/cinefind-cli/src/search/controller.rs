//! Query state: search text, page number, selection, and the current result page.

use std::fmt;

use cinefind_api::tmdb::{MovieSummary, SearchMovieResponse};

use super::notify::{Notification, Notifier};

/// Shown when a blank query is submitted.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter your search query.";

/// Shown when a result page resolves with no movies.
pub const NO_RESULTS_MESSAGE: &str = "No movies found for your request.";

/// Identifies one catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Search text.
    pub query: String,
    /// 1-based page number.
    pub page: u32,
}

/// A fetch the runtime must issue on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation stamped when the request was issued.
    pub generation: u64,
    /// Requested key.
    pub key: QueryKey,
}

/// A resolved fetch, successful or not.
#[derive(Debug)]
pub struct FetchResponse {
    /// Generation of the originating request.
    pub generation: u64,
    /// Key of the originating request.
    pub key: QueryKey,
    /// Result page or transport error.
    pub outcome: anyhow::Result<SearchMovieResponse>,
}

/// Rejected controller commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The submitted text was empty or whitespace only.
    EmptyQuery,
    /// The requested page is outside `1..=total_pages`.
    PageOutOfRange {
        /// Requested page.
        page: u32,
        /// Pages available for the current result.
        total_pages: u32,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "{EMPTY_QUERY_MESSAGE}"),
            Self::PageOutOfRange { page, total_pages } => {
                write!(f, "page {page} is out of range (1..={total_pages})")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Trims `text` and rejects blank input.
///
/// # Errors
///
/// Returns `SearchError::EmptyQuery` if `text` is empty or whitespace only.
pub fn normalize_query(text: &str) -> Result<&str, SearchError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(trimmed)
}

/// Owns the search text, page number, selection, and the last result page.
///
/// Every command that changes `(query, page)` returns the `FetchRequest` to
/// issue. Responses are applied in key order: only the response carrying the
/// latest generation is accepted.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct QueryStateController {
    /// Current search text (empty = no active search).
    query: String,
    /// Current 1-based page.
    page: u32,
    /// Movie shown in the detail overlay.
    selection: Option<MovieSummary>,
    /// Last accepted result page.
    results: Option<SearchMovieResponse>,
    /// Key the accepted result page was fetched for.
    results_key: Option<QueryKey>,
    /// A request for the current key is in flight.
    is_fetching: bool,
    /// The last request for the current key failed.
    is_error: bool,
    /// Generation of the most recently issued request.
    generation: u64,
    /// Key of the most recently issued request.
    requested: Option<QueryKey>,
}

impl Default for QueryStateController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStateController {
    /// Creates an idle controller with no active search.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: String::new(),
            page: 1,
            selection: None,
            results: None,
            results_key: None,
            is_fetching: false,
            is_error: false,
            generation: 0,
            requested: None,
        }
    }

    /// Current search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Currently selected movie.
    #[must_use]
    pub const fn selection(&self) -> Option<&MovieSummary> {
        self.selection.as_ref()
    }

    /// Result page on display. May belong to the previous key while a new
    /// fetch is in flight.
    #[must_use]
    pub const fn results(&self) -> Option<&SearchMovieResponse> {
        self.results.as_ref()
    }

    /// Total pages available for the current query.
    ///
    /// 0 until a page of the current query has landed; a result still on
    /// display from a previous query does not count.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        match (&self.results, &self.results_key) {
            (Some(results), Some(key)) if key.query == self.query => results.total_pages,
            _ => 0,
        }
    }

    /// A fetch is in flight.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// A fetch is in flight and there is nothing to show meanwhile.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_fetching && self.results.is_none()
    }

    /// The last fetch for the current key failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Submits a new search.
    ///
    /// Replaces the query and resets the page to 1 in one step.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyQuery` for blank input, after sending one
    /// error notification. State is left untouched in that case.
    pub fn submit_search(
        &mut self,
        text: &str,
        notifier: &mut impl Notifier,
    ) -> Result<Option<FetchRequest>, SearchError> {
        let query = match normalize_query(text) {
            Ok(query) => query,
            Err(err) => {
                notifier.notify(Notification::error(EMPTY_QUERY_MESSAGE));
                return Err(err);
            }
        };

        self.query = String::from(query);
        self.page = 1;
        let request = self.refresh();
        if request.is_none() && self.shows_empty_current_page() {
            notifier.notify(Notification::error(NO_RESULTS_MESSAGE));
        }
        Ok(request)
    }

    /// Moves to page `page`, keeping the query.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::PageOutOfRange` if no result page offers `page`.
    pub fn select_page(&mut self, page: u32) -> Result<Option<FetchRequest>, SearchError> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(SearchError::PageOutOfRange { page, total_pages });
        }

        self.page = page;
        Ok(self.refresh())
    }

    /// Moves one page forward, staying put on the last page.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if self.page >= self.total_pages() {
            return None;
        }
        self.select_page(self.page.saturating_add(1)).ok().flatten()
    }

    /// Moves one page back, staying put on the first page.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        if self.page <= 1 {
            return None;
        }
        self.select_page(self.page.saturating_sub(1)).ok().flatten()
    }

    /// Replaces the selection. `None` dismisses the detail overlay.
    pub fn select_movie(&mut self, movie: Option<MovieSummary>) {
        self.selection = movie;
    }

    /// Applies a resolved fetch.
    ///
    /// Returns `false` when the response is stale and was dropped.
    pub fn apply_response(&mut self, response: FetchResponse, notifier: &mut impl Notifier) -> bool {
        if response.generation != self.generation {
            tracing::debug!(
                generation = response.generation,
                current = self.generation,
                query = %response.key.query,
                page = response.key.page,
                "discarding stale catalog response"
            );
            return false;
        }

        self.is_fetching = false;
        match response.outcome {
            Ok(page) => {
                self.is_error = false;
                if page.results.is_empty() {
                    notifier.notify(Notification::error(NO_RESULTS_MESSAGE));
                }
                self.results = Some(page);
                self.results_key = Some(response.key);
            }
            Err(err) => {
                tracing::debug!(error = ?err, "catalog fetch failed");
                self.is_error = true;
                self.results = None;
                self.results_key = None;
            }
        }
        true
    }

    /// The settled result on display is an empty page for the current key.
    fn shows_empty_current_page(&self) -> bool {
        !self.is_fetching
            && self.results.as_ref().is_some_and(|r| r.results.is_empty())
            && self
                .results_key
                .as_ref()
                .is_some_and(|k| k.query == self.query && k.page == self.page)
    }

    /// Issues a fetch for the current key unless it is already requested.
    ///
    /// A failed key is requested again.
    fn refresh(&mut self) -> Option<FetchRequest> {
        if self.query.is_empty() {
            return None;
        }

        let key = QueryKey {
            query: self.query.clone(),
            page: self.page,
        };
        if self.requested.as_ref() == Some(&key) && !self.is_error {
            return None;
        }

        self.generation = self.generation.saturating_add(1);
        self.requested = Some(key.clone());
        self.is_fetching = true;
        self.is_error = false;

        tracing::debug!(
            generation = self.generation,
            query = %key.query,
            page = key.page,
            "issuing catalog fetch"
        );
        Some(FetchRequest {
            generation: self.generation,
            key,
        })
    }
}
