//! Network event handling: the query synchronization engine.
//!
//! Every query-affecting change to a list view lands here as an event. The
//! handler builds the backend request from the snapshot captured at dispatch
//! time, and results flow back through the sequence guards on the list
//! states so a superseded response can never overwrite newer state. Search
//! keystrokes take a detour through the per-view debounce timers.

use crate::api::{ClientQuery, Crm, ProspectUpdate};
use crate::events::debounce::Debouncer;
use crate::state::{ClientList, FilterSnapshot, ProspectList};
use anyhow::Result;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    FetchProspects { snapshot: FilterSnapshot, seq: u64 },
    FetchClients { query: ClientQuery, seq: u64 },
    SearchInput { value: String },
    ClientSearchInput { value: String },
    CancelSearch,
    CancelClientSearch,
    GetProspectDetail { id: i64 },
    UpdateProspect { id: i64, update: ProspectUpdate },
    DeleteProspect { id: i64 },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    prospects: &'a Arc<Mutex<ProspectList>>,
    clients: &'a Arc<Mutex<ClientList>>,
    crm: &'a mut Crm,
    search_debounce: Debouncer,
    client_search_debounce: Debouncer,
}

impl<'a> Handler<'a> {
    /// Return new instance with references to the list states.
    ///
    pub fn new(
        prospects: &'a Arc<Mutex<ProspectList>>,
        clients: &'a Arc<Mutex<ClientList>>,
        crm: &'a mut Crm,
        debounce_delay: Duration,
    ) -> Self {
        Handler {
            prospects,
            clients,
            crm,
            search_debounce: Debouncer::new(debounce_delay),
            client_search_debounce: Debouncer::new(debounce_delay),
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::FetchProspects { snapshot, seq } => self.fetch_prospects(snapshot, seq).await,
            Event::FetchClients { query, seq } => self.fetch_clients(query, seq).await,
            Event::SearchInput { value } => {
                self.schedule_search_commit(value);
                Ok(())
            }
            Event::ClientSearchInput { value } => {
                self.schedule_client_search_commit(value);
                Ok(())
            }
            Event::CancelSearch => {
                self.search_debounce.cancel();
                Ok(())
            }
            Event::CancelClientSearch => {
                self.client_search_debounce.cancel();
                Ok(())
            }
            Event::GetProspectDetail { id } => self.prospect_detail(id).await,
            Event::UpdateProspect { id, update } => self.update_prospect(id, update).await,
            Event::DeleteProspect { id } => self.delete_prospect(id).await,
        }
    }

    /// Fetch one page of prospects for the given snapshot. A failure is
    /// recoverable: the previous rows stay visible and the view gets a
    /// message.
    ///
    async fn fetch_prospects(&mut self, snapshot: FilterSnapshot, seq: u64) -> Result<()> {
        debug!("Fetching prospects page {} (seq {})...", snapshot.page, seq);
        match self.crm.prospects(&snapshot.to_query()).await {
            Ok(page) => {
                let count = page.items.len();
                let last_page = page.meta.last_page;
                let mut prospects = self.prospects.lock().await;
                if prospects.apply_page(seq, page) {
                    info!(
                        "Received {} prospects (page {} of {}).",
                        count,
                        prospects.meta().current_page,
                        last_page
                    );
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch prospects: {}", e);
                let mut prospects = self.prospects.lock().await;
                prospects.apply_error(seq, format!("Could not load prospects: {}", e));
                Ok(())
            }
        }
    }

    /// Fetch one page of clients for the given query.
    ///
    async fn fetch_clients(&mut self, query: ClientQuery, seq: u64) -> Result<()> {
        debug!("Fetching clients page {} (seq {})...", query.page, seq);
        match self.crm.clients(&query).await {
            Ok(page) => {
                let count = page.items.len();
                let mut clients = self.clients.lock().await;
                if clients.apply_page(seq, page) {
                    info!("Received {} clients.", count);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch clients: {}", e);
                let mut clients = self.clients.lock().await;
                clients.apply_error(seq, format!("Could not load clients: {}", e));
                Ok(())
            }
        }
    }

    /// Restart the prospect search debounce with the latest keystroke. The
    /// commit locks the list, applies the term, and the resulting fetch
    /// flows back through the event channel.
    ///
    fn schedule_search_commit(&mut self, value: String) {
        let prospects = Arc::clone(self.prospects);
        self.search_debounce.schedule(async move {
            let mut prospects = prospects.lock().await;
            if !prospects.commit_search_term(&value) {
                debug!("Prospect search term unchanged; skipping fetch.");
            }
        });
    }

    /// Restart the client search debounce with the latest keystroke.
    ///
    fn schedule_client_search_commit(&mut self, value: String) {
        let clients = Arc::clone(self.clients);
        self.client_search_debounce.schedule(async move {
            let mut clients = clients.lock().await;
            if !clients.commit_search_term(&value) {
                debug!("Client search term unchanged; skipping fetch.");
            }
        });
    }

    /// Fetch full details for a prospect.
    ///
    async fn prospect_detail(&mut self, id: i64) -> Result<()> {
        info!("Fetching details for prospect {}...", id);
        let prospect = self.crm.prospect(id).await?;
        let mut prospects = self.prospects.lock().await;
        prospects.set_detail(prospect);
        info!("Prospect details loaded.");
        Ok(())
    }

    /// Apply field updates to a prospect, then refresh whatever shows it.
    ///
    async fn update_prospect(&mut self, id: i64, update: ProspectUpdate) -> Result<()> {
        info!("Updating prospect {}...", id);
        let updated = self.crm.update_prospect(id, &update).await?;
        let mut prospects = self.prospects.lock().await;
        if prospects.detail().map(|detail| detail.id) == Some(id) {
            prospects.set_detail(updated);
        }
        prospects.refresh();
        info!("Prospect {} updated.", id);
        Ok(())
    }

    /// Delete a prospect and refetch the current page.
    ///
    async fn delete_prospect(&mut self, id: i64) -> Result<()> {
        info!("Deleting prospect {}...", id);
        self.crm.delete_prospect(id).await?;
        let mut prospects = self.prospects.lock().await;
        prospects.refresh();
        info!("Prospect {} deleted.", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::mpsc;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(500);

    fn wired_lists() -> (
        mpsc::Receiver<Event>,
        Arc<Mutex<ProspectList>>,
        Arc<Mutex<ClientList>>,
    ) {
        let (tx, rx) = mpsc::channel::<Event>();
        let prospects = Arc::new(Mutex::new(ProspectList::new(tx.clone())));
        let clients = Arc::new(Mutex::new(ClientList::new(tx)));
        (rx, prospects, clients)
    }

    fn page_body(names: &[&str], current_page: usize, last_page: usize) -> serde_json::Value {
        let items: Vec<serde_json::Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i as i64 + 1,
                    "name": name,
                    "status": "active",
                    "createdAt": "2026-01-02T10:00:00Z"
                })
            })
            .collect();
        json!({
            "items": items,
            "currentPage": current_page,
            "lastPage": last_page,
            "totalItems": names.len()
        })
    }

    #[tokio::test]
    async fn fetch_applies_rows_and_meta() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/prospects");
                then.status(200).json_body(page_body(&["Acme Holdings"], 1, 3));
            })
            .await;

        let (rx, prospects, clients) = wired_lists();
        prospects.lock().await.reload();
        let mut crm = Crm::new("token", &server.base_url());
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);

        let event = rx.try_recv().expect("reload should dispatch a fetch");
        handler.handle(event).await?;

        let prospects = prospects.lock().await;
        assert_eq!(prospects.rows().len(), 1);
        assert_eq!(prospects.meta().last_page, 3);
        assert!(!prospects.is_loading());
        assert!(prospects.error_message().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn superseded_response_is_discarded() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/prospects")
                    .query_param("searchTerm", "alpha");
                then.status(200).json_body(page_body(&["Alpha Corp"], 1, 1));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/prospects")
                    .query_param("searchTerm", "beta");
                then.status(200).json_body(page_body(&["Beta Corp"], 1, 1));
            })
            .await;

        let (rx, prospects, clients) = wired_lists();
        {
            let mut prospects = prospects.lock().await;
            prospects.commit_search_term("alpha");
            // A newer term supersedes the fetch already in the queue.
            prospects.commit_search_term("beta");
        }
        let mut crm = Crm::new("token", &server.base_url());
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);

        handler.handle(rx.try_recv().unwrap()).await?;
        {
            let prospects = prospects.lock().await;
            assert!(prospects.rows().is_empty());
            assert!(prospects.is_loading());
        }

        handler.handle(rx.try_recv().unwrap()).await?;
        let prospects = prospects.lock().await;
        assert_eq!(prospects.rows()[0].name, "Beta Corp");
        assert!(!prospects.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_keeps_rows_and_surfaces_a_message() -> Result<()> {
        let server = MockServer::start();
        let good = server
            .mock_async(|when, then| {
                when.method("GET").path("/prospects").query_param("page", "1");
                then.status(200).json_body(page_body(&["Acme Holdings"], 1, 3));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/prospects").query_param("page", "2");
                then.status(500).json_body(json!({"message": "backend down"}));
            })
            .await;

        let (rx, prospects, clients) = wired_lists();
        prospects.lock().await.reload();
        let mut crm = Crm::new("token", &server.base_url());
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);
        handler.handle(rx.try_recv().unwrap()).await?;
        good.assert_async().await;

        prospects.lock().await.go_to_page(2);
        handler.handle(rx.try_recv().unwrap()).await?;

        let prospects = prospects.lock().await;
        assert_eq!(prospects.rows()[0].name, "Acme Holdings");
        assert!(prospects
            .error_message()
            .unwrap()
            .contains("Could not load prospects"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_search_input_commits_once() -> Result<()> {
        let (rx, prospects, clients) = wired_lists();
        let mut crm = Crm::new("token", "http://127.0.0.1:9");
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);

        {
            let mut prospects = prospects.lock().await;
            prospects.set_search_input("foo");
            prospects.set_search_input("foobar");
        }
        handler.handle(rx.try_recv().unwrap()).await?;
        handler.handle(rx.try_recv().unwrap()).await?;
        sleep(DELAY * 2).await;

        let fetches: Vec<Event> = rx.try_iter().collect();
        assert_eq!(fetches.len(), 1);
        match &fetches[0] {
            Event::FetchProspects { snapshot, .. } => {
                assert_eq!(snapshot.search_term, "foobar");
                assert_eq!(snapshot.page, 1);
            }
            other => panic!("Expected a prospect fetch, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_refetches_the_current_page() -> Result<()> {
        let server = MockServer::start();
        let delete = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/prospects/7");
                then.status(204);
            })
            .await;

        let (rx, prospects, clients) = wired_lists();
        prospects.lock().await.delete_prospect(7);
        let mut crm = Crm::new("token", &server.base_url());
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);
        handler.handle(rx.try_recv().unwrap()).await?;
        delete.assert_async().await;

        assert!(matches!(
            rx.try_recv(),
            Ok(Event::FetchProspects { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn client_fetch_applies_rows() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/clients");
                then.status(200).json_body(json!({
                    "items": [{"id": 1, "name": "Orbit Labs", "createdAt": "2026-01-02T10:00:00Z"}],
                    "currentPage": 1,
                    "lastPage": 1,
                    "totalItems": 1
                }));
            })
            .await;

        let (rx, prospects, clients) = wired_lists();
        clients.lock().await.reload();
        let mut crm = Crm::new("token", &server.base_url());
        let mut handler = Handler::new(&prospects, &clients, &mut crm, DELAY);
        handler.handle(rx.try_recv().unwrap()).await?;

        let clients = clients.lock().await;
        assert_eq!(clients.rows()[0].name, "Orbit Labs");
        Ok(())
    }
}
