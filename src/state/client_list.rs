//! Client list orchestration.
//!
//! The client view is a reduced form of the prospect list: free-text search
//! and pagination only, with the same debounce and sequence-guard behavior.

use crate::api::{ClientQuery, ClientRecord, Page, PageMeta};
use crate::app::NetworkEventSender;
use crate::events::network::Event as NetworkEvent;
use crate::pagination;
use log::*;

/// Houses the state of the client list view.
///
pub struct ClientList {
    net_sender: Option<NetworkEventSender>,
    search_term: String,
    search_input: String,
    page: usize,
    rows: Vec<ClientRecord>,
    meta: PageMeta,
    is_loading: bool,
    error_message: Option<String>,
    query_seq: u64,
}

impl Default for ClientList {
    fn default() -> ClientList {
        ClientList {
            net_sender: None,
            search_term: String::new(),
            search_input: String::new(),
            page: 1,
            rows: vec![],
            meta: PageMeta::default(),
            is_loading: false,
            error_message: None,
            query_seq: 0,
        }
    }
}

impl ClientList {
    /// Return a new instance wired to the network engine.
    ///
    pub fn new(net_sender: NetworkEventSender) -> ClientList {
        ClientList {
            net_sender: Some(net_sender),
            ..ClientList::default()
        }
    }

    /// Returns the rows of the current page.
    ///
    pub fn rows(&self) -> &[ClientRecord] {
        &self.rows
    }

    /// Returns the pagination metadata of the current page.
    ///
    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    /// Returns the abbreviated page sequence for the pagination controls.
    ///
    pub fn page_window(&self) -> Vec<Option<usize>> {
        pagination::window(self.meta.current_page, self.meta.last_page)
    }

    /// True while a fetch for the current query is outstanding.
    ///
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the last fetch failure, cleared by the next applied result.
    ///
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the raw search box contents (pre-debounce).
    ///
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Returns the applied search term; empty means no search.
    ///
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Builds the backend query for the current inputs.
    ///
    pub fn query(&self) -> ClientQuery {
        ClientQuery {
            page: self.page,
            search: if self.search_term.is_empty() {
                None
            } else {
                Some(self.search_term.clone())
            },
        }
    }

    /// Dispatches an asynchronous network event.
    ///
    fn dispatch(&self, event: NetworkEvent) {
        if let Some(net_sender) = &self.net_sender {
            if let Err(err) = net_sender.send(event) {
                error!("Received error from network dispatch: {}", err);
            }
        }
    }

    /// Bumps the sequence and dispatches a fetch for the current query.
    ///
    pub(crate) fn refresh(&mut self) {
        self.query_seq += 1;
        self.is_loading = true;
        self.dispatch(NetworkEvent::FetchClients {
            query: self.query(),
            seq: self.query_seq,
        });
    }

    /// Triggers the initial (or a manual) fetch of the current query.
    ///
    pub fn reload(&mut self) {
        self.refresh();
    }

    /// Records raw search box input and hands it to the engine's debounce.
    ///
    pub fn set_search_input(&mut self, text: &str) {
        self.search_input = text.to_string();
        self.dispatch(NetworkEvent::ClientSearchInput {
            value: text.to_string(),
        });
    }

    /// Commits a debounced search term. Returns false when the term matches
    /// the current one and no fetch is needed.
    ///
    pub(crate) fn commit_search_term(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.to_lowercase() == self.search_term.to_lowercase() {
            return false;
        }
        self.search_term = value.to_string();
        self.page = 1;
        self.refresh();
        true
    }

    /// Clears the search and refetches when it was set.
    ///
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.dispatch(NetworkEvent::CancelClientSearch);
        if !self.search_term.is_empty() {
            self.search_term.clear();
            self.page = 1;
            self.refresh();
        }
    }

    /// Requests the given page. Out-of-range and redundant requests are
    /// silent no-ops.
    ///
    pub fn go_to_page(&mut self, page: usize) {
        if page < 1 || page > self.meta.last_page || page == self.page {
            return;
        }
        self.page = page;
        self.refresh();
    }

    /// Requests the next page, stopping at the last.
    ///
    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    /// Requests the previous page, stopping at the first.
    ///
    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.go_to_page(self.page - 1);
        }
    }

    /// Invalidates pending work when the view unmounts.
    ///
    pub fn leave(&mut self) {
        self.query_seq += 1;
        self.is_loading = false;
        self.dispatch(NetworkEvent::CancelClientSearch);
    }

    /// Drops the connection to the network engine.
    ///
    pub(crate) fn detach(&mut self) {
        self.net_sender = None;
    }

    /// Applies a completed fetch if it is still the newest one.
    ///
    pub(crate) fn apply_page(&mut self, seq: u64, page: Page<ClientRecord>) -> bool {
        if seq != self.query_seq {
            debug!(
                "Discarding stale client page (seq {} superseded by {})",
                seq, self.query_seq
            );
            return false;
        }
        self.rows = page.items;
        self.meta = page.meta;
        self.page = self.meta.current_page.max(1);
        self.is_loading = false;
        self.error_message = None;
        true
    }

    /// Records a failed fetch without disturbing the last good rows.
    ///
    pub(crate) fn apply_error(&mut self, seq: u64, message: String) -> bool {
        if seq != self.query_seq {
            return false;
        }
        self.is_loading = false;
        self.error_message = Some(message);
        true
    }
}
