//! # Mock Store
//!
//! Utilities for testing the catalog core against a scripted store.
//!
//! Use [`MockCollection`] / [`MockCounter`] to queue the replies the store should
//! give, in order, and [`verify`](MockCollection::verify) that all of them were used.
//! For step-by-step control, [`create_mock_collection`] hands back the raw request
//! receiver so a test can inspect each request before answering it.

use crate::docstore::client::CollectionClient;
use crate::docstore::document::{Document, Filter, Version};
use crate::docstore::error::StoreError;
use crate::docstore::message::{CounterRequest, Response, StoreRequest};
use crate::docstore::CounterClient;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock collection.
enum Expectation<D: Document> {
    Insert(Result<D, StoreError>),
    FindOne(Result<D, StoreError>),
    FindMany(Result<Vec<D>, StoreError>),
    Count(Result<usize, StoreError>),
    Replace(Result<D, StoreError>),
    Delete(Result<D, StoreError>),
}

impl<D: Document> Expectation<D> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Insert(_) => "Insert",
            Expectation::FindOne(_) => "FindOne",
            Expectation::FindMany(_) => "FindMany",
            Expectation::Count(_) => "Count",
            Expectation::Replace(_) => "ConditionalReplace",
            Expectation::Delete(_) => "DeleteOne",
        }
    }
}

/// A scripted collection. Requests are answered from the queued expectations in order.
///
/// # Example
/// ```ignore
/// let mock = MockCollection::<ProductEntity>::new();
/// mock.expect_insert().return_err(StoreError::Unavailable("down".into()));
///
/// let store = mock.client();
/// // Use store in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockCollection<D: Document> {
    client: CollectionClient<D>,
    expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<D: Document> MockCollection<D> {
    /// Creates a new mock collection with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<D>>(100);
        let expectations: Arc<Mutex<VecDeque<Expectation<D>>>> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();

                match (request, next) {
                    (StoreRequest::Insert { respond_to, .. }, Some(Expectation::Insert(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::FindOne { respond_to, .. }, Some(Expectation::FindOne(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::FindMany { respond_to, .. }, Some(Expectation::FindMany(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::Count { respond_to, .. }, Some(Expectation::Count(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::ConditionalReplace { respond_to, .. },
                        Some(Expectation::Replace(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::DeleteOne { respond_to, .. }, Some(Expectation::Delete(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (request, expected) => {
                        panic!(
                            "Unexpected request {:?}, expected {}",
                            request,
                            expected.map_or("nothing", |e| e.name())
                        );
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the store handle for use in tests.
    pub fn client(&self) -> CollectionClient<D> {
        self.client.clone()
    }

    pub fn expect_insert(&self) -> ExpectationBuilder<D, D> {
        self.builder(Expectation::Insert)
    }

    pub fn expect_find_one(&self) -> ExpectationBuilder<D, D> {
        self.builder(Expectation::FindOne)
    }

    pub fn expect_find_many(&self) -> ExpectationBuilder<D, Vec<D>> {
        self.builder(Expectation::FindMany)
    }

    pub fn expect_count(&self) -> ExpectationBuilder<D, usize> {
        self.builder(Expectation::Count)
    }

    pub fn expect_replace(&self) -> ExpectationBuilder<D, D> {
        self.builder(Expectation::Replace)
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<D, D> {
        self.builder(Expectation::Delete)
    }

    fn builder<T>(&self, wrap: fn(Result<T, StoreError>) -> Expectation<D>) -> ExpectationBuilder<D, T> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<D: Document> Default for MockCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that queues the reply for one expected request.
pub struct ExpectationBuilder<D: Document, T> {
    wrap: fn(Result<T, StoreError>) -> Expectation<D>,
    expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
}

impl<D: Document, T> ExpectationBuilder<D, T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.expectations.lock().unwrap().push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.expectations.lock().unwrap().push_back((self.wrap)(Err(error)));
    }
}

/// A scripted counter store: each increment returns the next queued value.
pub struct MockCounter {
    client: CounterClient,
    replies: Arc<Mutex<VecDeque<Result<u64, StoreError>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockCounter {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CounterRequest>(100);
        let client = CounterClient::new(sender);
        let replies: Arc<Mutex<VecDeque<Result<u64, StoreError>>>> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = replies.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                match request {
                    CounterRequest::IncrementOrCreate { name, respond_to } => {
                        let reply = queue.lock().unwrap().pop_front();
                        let reply = reply.unwrap_or_else(|| panic!("Unexpected increment of {}", name));
                        let _ = respond_to.send(reply);
                    }
                    CounterRequest::Current { name, .. } => {
                        panic!("Unexpected read of counter {}", name);
                    }
                }
            }
        });

        Self {
            client,
            replies,
            _handle: handle,
        }
    }

    pub fn client(&self) -> CounterClient {
        self.client.clone()
    }

    /// Queue the value the next increment returns.
    pub fn expect_next(&self, value: u64) {
        self.replies.lock().unwrap().push_back(Ok(value));
    }

    pub fn expect_next_err(&self, error: StoreError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn verify(&self) {
        let replies = self.replies.lock().unwrap();
        if !replies.is_empty() {
            panic!("Not all counter expectations were met. {} remaining", replies.len());
        }
    }
}

impl Default for MockCounter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// LOW-LEVEL HELPERS
// =============================================================================

/// Creates a collection client and the receiver its requests arrive on.
///
/// # Testing Strategy
/// Instead of spinning up a real [`CollectionActor`](crate::docstore::CollectionActor),
/// the test plays the actor: it receives each request, asserts on it, and answers
/// through the embedded reply channel. This lets a test pause the store between two
/// steps of a multi-step operation.
pub fn create_mock_collection<D: Document>(
    buffer_size: usize,
) -> (CollectionClient<D>, mpsc::Receiver<StoreRequest<D>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Helper to verify that the next message is a ConditionalReplace request
pub async fn expect_replace<D: Document>(
    receiver: &mut mpsc::Receiver<StoreRequest<D>>,
) -> Option<(Filter<D::Query>, Version, D::Patch, Response<D>)> {
    match receiver.recv().await {
        Some(StoreRequest::ConditionalReplace {
            filter,
            expected,
            patch,
            respond_to,
        }) => Some((filter, expected, patch, respond_to)),
        _ => None,
    }
}
