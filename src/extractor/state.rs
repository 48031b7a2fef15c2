//! Fetch-once page state shared by every extractor.

use std::future::Future;

use tracing::debug;

use crate::error::ExtractionError;

#[derive(Debug)]
enum FetchState<S> {
    Unfetched,
    Fetched(S),
    Failed(ExtractionError),
}

/// Lazily populated, service-specific page state.
///
/// Moves `Unfetched → Fetched | Failed` exactly once. The in-flight step is not
/// represented: [`fetch_once`](Self::fetch_once) holds `&mut self` across the
/// request, so no reader can observe it, and a dropped fetch future leaves the
/// state `Unfetched`.
#[derive(Debug)]
pub struct PageState<S> {
    state: FetchState<S>,
}

impl<S> PageState<S> {
    /// Creates unfetched state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FetchState::Unfetched,
        }
    }

    /// Creates state that is already fetched, for extractors built from a
    /// parent's response (e.g. a tab carved out of a channel page).
    #[must_use]
    pub fn prefetched(state: S) -> Self {
        Self {
            state: FetchState::Fetched(state),
        }
    }

    /// Returns true once a fetch has succeeded.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self.state, FetchState::Fetched(_))
    }

    /// Runs `load` unless a fetch already happened.
    ///
    /// A repeated call issues no request: it returns `Ok(())` after a success
    /// and the memoized error after a failure.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `load`, now or on an earlier call.
    pub async fn fetch_once<F, Fut>(&mut self, load: F) -> Result<(), ExtractionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, ExtractionError>>,
    {
        match &self.state {
            FetchState::Fetched(_) => {
                debug!("Page already fetched; skipping request");
                return Ok(());
            }
            FetchState::Failed(error) => return Err(error.clone()),
            FetchState::Unfetched => {}
        }

        match load().await {
            Ok(state) => {
                self.state = FetchState::Fetched(state);
                Ok(())
            }
            Err(error) => {
                self.state = FetchState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Borrows the fetched state.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::IllegalArgument`] before any fetch, and the
    /// memoized fetch error after a failed fetch.
    pub fn get(&self) -> Result<&S, ExtractionError> {
        match &self.state {
            FetchState::Fetched(state) => Ok(state),
            FetchState::Failed(error) => Err(error.clone()),
            FetchState::Unfetched => Err(ExtractionError::not_fetched()),
        }
    }
}

impl<S> Default for PageState<S> {
    fn default() -> Self {
        Self::new()
    }
}
