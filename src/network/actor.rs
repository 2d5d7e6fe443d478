//! Network actor - runs HTTP requests in the Tokio runtime.
//!
//! The only source of concurrency in the application: each dispatch is
//! spawned off the event-processing path and posts exactly one
//! completion event back into the app actor's queue. It never touches
//! app state directly.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::network::{NetworkCommand, NetworkEvent};
use crate::network::client::{build_url, create_client, execute_request};

pub struct NetworkActor {
    client: reqwest::Client,
    event_tx: mpsc::UnboundedSender<NetworkEvent>,
    in_flight: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(event_tx: mpsc::UnboundedSender<NetworkEvent>) -> Self {
        NetworkActor {
            client: create_client(),
            event_tx,
            in_flight: JoinSet::new(),
        }
    }

    /// Run the network actor message loop.
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, method, base_url, path, params, body }) => {
                            let url = build_url(&base_url, &path, &params);
                            let event_tx = self.event_tx.clone();
                            let client = self.client.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, %method, %url, "executing request");
                                let result = execute_request(&client, &method, &url, body).await;
                                let _ = event_tx.send(NetworkEvent::Completed { id, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                // Reap finished request tasks.
                Some(_result) = self.in_flight.join_next() => {}
            }
        }
    }
}
