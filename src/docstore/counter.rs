//! # Counter Actor
//!
//! Owns the named counter documents. Increment-or-create is handled inside the
//! actor loop as one step, so two concurrent callers can never observe the same
//! pre-increment value.

use crate::docstore::error::StoreError;
use crate::docstore::message::{CounterRequest, Response};
use crate::docstore::store::CounterStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// The actor that owns every named counter.
pub struct CounterActor {
    receiver: mpsc::Receiver<CounterRequest>,
    counters: HashMap<String, u64>,
}

impl CounterActor {
    pub fn new(buffer_size: usize) -> (Self, CounterClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            counters: HashMap::new(),
        };
        (actor, CounterClient::new(sender))
    }

    pub async fn run(mut self) {
        info!("Counters started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CounterRequest::IncrementOrCreate { name, respond_to } => {
                    let value = self.counters.entry(name.clone()).or_insert(0);
                    *value += 1;
                    debug!(counter = %name, value = *value, "Incremented");
                    let _ = respond_to.send(Ok(*value));
                }
                CounterRequest::Current { name, respond_to } => {
                    let value = self.counters.get(&name).copied();
                    debug!(counter = %name, ?value, "Current");
                    let _ = respond_to.send(Ok(value));
                }
            }
        }

        info!(counters = self.counters.len(), "Shutdown");
    }
}

/// Cloneable handle to the [`CounterActor`].
#[derive(Clone)]
pub struct CounterClient {
    sender: mpsc::Sender<CounterRequest>,
}

impl CounterClient {
    pub fn new(sender: mpsc::Sender<CounterRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> CounterRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Unavailable("counter actor closed".into()))?;
        response
            .await
            .map_err(|_| StoreError::Unavailable("counter actor dropped response".into()))?
    }
}

#[async_trait]
impl CounterStore for CounterClient {
    async fn increment_or_create(&self, name: &str) -> Result<u64, StoreError> {
        let name = name.to_string();
        self.request(|respond_to| CounterRequest::IncrementOrCreate { name, respond_to })
            .await
    }

    async fn current(&self, name: &str) -> Result<Option<u64>, StoreError> {
        let name = name.to_string();
        self.request(|respond_to| CounterRequest::Current { name, respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counter_is_created_on_first_increment() {
        let (actor, client) = CounterActor::new(8);
        tokio::spawn(actor.run());

        assert_eq!(client.current("_seq").await.unwrap(), None);
        assert_eq!(client.increment_or_create("_seq").await.unwrap(), 1);
        assert_eq!(client.increment_or_create("_seq").await.unwrap(), 2);
        assert_eq!(client.current("_seq").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let (actor, client) = CounterActor::new(8);
        tokio::spawn(actor.run());

        client.increment_or_create("a").await.unwrap();
        client.increment_or_create("a").await.unwrap();
        assert_eq!(client.increment_or_create("b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_unavailable() {
        let (actor, client) = CounterActor::new(8);
        drop(actor);

        let err = client.increment_or_create("a").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
