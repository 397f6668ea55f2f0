//! Application wiring for presentation front ends.
//!
//! [`App`] owns the shared list states and the background network worker
//! that drains query events. A front end starts it once, drives the list
//! states through their mutation methods, renders from their accessors, and
//! shuts it down when the session ends.

use crate::api::Crm;
use crate::config::Config;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::state::{ClientList, ProspectList};
use anyhow::{anyhow, Result};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing and shared list-view state.
///
pub struct App {
    prospects: Arc<Mutex<ProspectList>>,
    clients: Arc<Mutex<ClientList>>,
    net_sender: NetworkEventSender,
}

impl App {
    /// Start the background query engine according to the given
    /// configuration and trigger the initial fetch of both list views.
    ///
    pub async fn start(config: Config) -> Result<App> {
        info!("Starting Leadline core...");
        let access_token = config
            .api_token
            .clone()
            .ok_or(anyhow!("Failed to retrieve API token"))?;

        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let app = App {
            prospects: Arc::new(Mutex::new(ProspectList::new(tx.clone()))),
            clients: Arc::new(Mutex::new(ClientList::new(tx.clone()))),
            net_sender: tx,
        };
        app.start_network(
            rx,
            access_token,
            config.base_url.clone(),
            Duration::from_millis(config.search_debounce_ms),
        );

        app.prospects.lock().await.reload();
        app.clients.lock().await.reload();
        Ok(app)
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(
        &self,
        net_receiver: NetworkEventReceiver,
        access_token: String,
        base_url: String,
        debounce_delay: Duration,
    ) {
        debug!("Creating new thread for asynchronous networking...");
        let prospects = Arc::clone(&self.prospects);
        let clients = Arc::clone(&self.clients);
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    let mut crm = Crm::new(&access_token, &base_url);
                    let mut network_event_handler =
                        NetworkEventHandler::new(&prospects, &clients, &mut crm, debounce_delay);
                    while let Ok(network_event) = net_receiver.recv() {
                        match network_event_handler.handle(network_event).await {
                            Ok(_) => (),
                            Err(e) => error!("Failed to handle network event: {}", e),
                        }
                    }
                    debug!("Network channel closed; stopping query engine.");
                })
        });
    }

    /// Returns a handle to the prospect list state.
    ///
    pub fn prospects(&self) -> Arc<Mutex<ProspectList>> {
        Arc::clone(&self.prospects)
    }

    /// Returns a handle to the client list state.
    ///
    pub fn clients(&self) -> Arc<Mutex<ClientList>> {
        Arc::clone(&self.clients)
    }

    /// Returns a sender for dispatching network events directly.
    ///
    pub fn sender(&self) -> NetworkEventSender {
        self.net_sender.clone()
    }

    /// Stop the query engine: pending debounces are cancelled, in-flight
    /// fetches become stale, and the worker thread exits once every event
    /// sender is gone.
    ///
    pub async fn shutdown(self) {
        info!("Shutting down Leadline core...");
        {
            let mut prospects = self.prospects.lock().await;
            prospects.leave();
            prospects.detach();
        }
        {
            let mut clients = self.clients.lock().await;
            clients.leave();
            clients.detach();
        }
        drop(self.net_sender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_without_a_token_fails() {
        let config = Config::new();
        assert!(App::start(config).await.is_err());
    }

    #[tokio::test]
    async fn start_issues_the_initial_fetches() -> Result<()> {
        let server = httpmock::MockServer::start();
        let prospects_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/prospects").query_param("page", "1");
                then.status(200).json_body(serde_json::json!({
                    "items": [],
                    "currentPage": 1,
                    "lastPage": 1,
                    "totalItems": 0
                }));
            })
            .await;
        let clients_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/clients").query_param("page", "1");
                then.status(200).json_body(serde_json::json!({
                    "items": [],
                    "currentPage": 1,
                    "lastPage": 1,
                    "totalItems": 0
                }));
            })
            .await;

        let mut config = Config::new();
        config.api_token = Some("token".to_string());
        config.base_url = server.base_url();
        config.search_debounce_ms = 10;

        let app = App::start(config).await?;
        // The worker drains both initial fetches in the background.
        for _ in 0..100 {
            if prospects_mock.hits_async().await > 0 && clients_mock.hits_async().await > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        prospects_mock.assert_async().await;
        clients_mock.assert_async().await;
        app.shutdown().await;
        Ok(())
    }
}
