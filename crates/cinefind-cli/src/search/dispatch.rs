//! Runs catalog fetches off the event loop and hands results back in order of arrival.

use std::sync::Arc;

use cinefind_api::tmdb::{CatalogApi, SearchMovieParams};
use tokio::sync::mpsc;

use super::controller::{FetchRequest, FetchResponse};

/// Request options that do not take part in the query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Response language (e.g. "en-US").
    pub language: String,
    /// Include adult titles.
    pub include_adult: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            include_adult: false,
        }
    }
}

impl SearchOptions {
    /// Builds endpoint parameters for a fetch request.
    #[must_use]
    pub fn params_for(&self, request: &FetchRequest) -> SearchMovieParams {
        SearchMovieParams::new(request.key.query.clone())
            .page(request.key.page)
            .language(self.language.clone())
            .include_adult(self.include_adult)
    }
}

/// Spawns one task per fetch and collects the responses on a channel.
///
/// In-flight fetches are never cancelled; the controller drops stale
/// responses by generation.
#[derive(Debug)]
pub struct FetchDispatcher<A> {
    api: Arc<A>,
    options: SearchOptions,
    tx: mpsc::UnboundedSender<FetchResponse>,
    rx: mpsc::UnboundedReceiver<FetchResponse>,
}

impl<A> FetchDispatcher<A>
where
    A: CatalogApi + Sync + 'static,
{
    /// Creates a dispatcher over `api`.
    #[must_use]
    pub fn new(api: Arc<A>, options: SearchOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            options,
            tx,
            rx,
        }
    }

    /// Starts the fetch on the current Tokio runtime.
    pub fn dispatch(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let params = self.options.params_for(&request);

        tokio::spawn(async move {
            let outcome = api.search_movie(&params).await;
            let response = FetchResponse {
                generation: request.generation,
                key: request.key,
                outcome,
            };
            // The receiver is gone only while shutting down.
            let _ = tx.send(response);
        });
    }

    /// Returns a resolved fetch if one is ready.
    pub fn try_recv(&mut self) -> Option<FetchResponse> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next resolved fetch.
    pub async fn recv(&mut self) -> Option<FetchResponse> {
        self.rx.recv().await
    }
}
