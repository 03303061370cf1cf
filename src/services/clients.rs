//! Clients page: full listing plus search through the API client.

use std::sync::Arc;

use serde::Serialize;

use crate::api::{self, ApiResult, HealthApi};
use crate::domain::client::Client;
use crate::search::{LatestOnly, SearchOutcome};

const LOAD_FAILED: &str = "Failed to load clients. Please try again later.";
const SEARCH_FAILED: &str = "Failed to search clients. Please try again.";

/// State of the clients page.
#[derive(Debug, Serialize)]
pub struct ClientsView {
    clients: Vec<Client>,
    filtered: Vec<Client>,
    search_term: String,
    is_loading: bool,
    error: Option<String>,
    #[serde(skip)]
    dispatcher: Arc<LatestOnly>,
}

impl Default for ClientsView {
    fn default() -> Self {
        Self::new(Arc::new(LatestOnly::default()))
    }
}

impl ClientsView {
    /// A view whose searches go through `dispatcher`.
    ///
    /// Share the dispatcher with every task that may search on behalf of this
    /// page so that only the newest search can deliver results.
    pub fn new(dispatcher: Arc<LatestOnly>) -> Self {
        Self {
            clients: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            is_loading: false,
            error: None,
            dispatcher,
        }
    }

    /// Fetches every client; the filtered list starts out unfiltered.
    pub async fn load<A>(&mut self, api: &A)
    where
        A: HealthApi + ?Sized,
    {
        self.is_loading = true;
        match api.get_clients().await {
            Ok(clients) => {
                self.filtered = clients.clone();
                self.clients = clients;
            }
            Err(err) => {
                log::error!("Error fetching clients: {err}");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Loads the collection and then applies a seeded search term.
    pub async fn load_with_search<A>(&mut self, api: &A, term: &str)
    where
        A: HealthApi + ?Sized,
    {
        self.load(api).await;
        if !term.is_empty() {
            self.search(api, term).await;
        }
    }

    /// Applies `term`, re-querying the API unless the term is blank.
    ///
    /// A search superseded by a newer one leaves the current results intact.
    pub async fn search<A>(&mut self, api: &A, term: &str)
    where
        A: HealthApi + ?Sized,
    {
        self.error = None;
        if term.trim().is_empty() {
            self.dispatcher.cancel();
            self.search_term = term.to_string();
            self.filtered = self.clients.clone();
            return;
        }

        self.is_loading = true;
        let outcome = self
            .dispatcher
            .run(|| api::search_clients(api, term))
            .await;
        self.apply_search(term, outcome);
    }

    /// Applies the result of a search that ran through this view's dispatcher.
    pub fn apply_search(&mut self, term: &str, outcome: SearchOutcome<ApiResult<Vec<Client>>>) {
        self.is_loading = false;
        match outcome {
            SearchOutcome::Completed(Ok(results)) => {
                self.search_term = term.to_string();
                self.filtered = results;
            }
            SearchOutcome::Completed(Err(err)) => {
                log::error!("Error searching clients: {err}");
                self.error = Some(SEARCH_FAILED.to_string());
            }
            SearchOutcome::Superseded => {
                log::debug!("Dropped superseded client search for {term:?}");
            }
        }
    }

    /// Dispatcher to hand to concurrently running searches.
    pub fn dispatcher(&self) -> Arc<LatestOnly> {
        Arc::clone(&self.dispatcher)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn filtered(&self) -> &[Client] {
        &self.filtered
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn empty_message(&self) -> &'static str {
        if self.search_term.is_empty() {
            "No clients registered yet."
        } else {
            "No clients match your search criteria."
        }
    }
}
