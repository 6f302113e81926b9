//! Effects - side effects declared by the reducer

use crate::action::Action;
use crate::search::{SearchHandler, SearchRequest};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand a validated request to the search handler
    Search(SearchRequest),
}

/// Body of the `"search"` task: run the handler and report back.
pub async fn run_search(handler: &dyn SearchHandler, request: SearchRequest) -> Action {
    match handler.search(&request).await {
        Ok(()) => {
            tracing::debug!("search handled");
            Action::SearchDidComplete(request)
        }
        Err(e) => {
            tracing::warn!(error = %e, "search handler failed");
            Action::SearchDidError(e.to_string())
        }
    }
}
