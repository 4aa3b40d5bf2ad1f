//! # Mock Framework
//!
//! Utilities for testing code that talks to a [`BridgeClient`] without
//! running the real actor.
//!
//! [`MockClient`] answers requests from a queue of expectations. Use
//! [`MockClient::expect_call`] to enqueue a reply, an error, or a request that
//! never answers (to exercise timeouts), then hand [`MockClient::client`] to
//! the code under test.

use crate::framework::{ActorEntity, BridgeClient, Envelope, FrameworkError, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// What the mock does with the next request.
enum Expectation<T: ActorEntity> {
    Reply(Result<T::Reply, FrameworkError>),
    /// Keep the responder alive without answering.
    Hang,
}

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<ChatSession>::new();
/// mock.expect_call().return_ok(SessionReply::Checkout(receipt));
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ActorEntity> {
    client: BridgeClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    received: Arc<Mutex<Vec<T::Request>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Envelope<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            let mut parked: Vec<Response<T::Reply>> = Vec::new();
            while let Some(Envelope {
                request,
                respond_to,
            }) = receiver.recv().await
            {
                received_clone.lock().unwrap().push(request);
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match expectation {
                    Some(Expectation::Reply(response)) => {
                        let _ = respond_to.send(response);
                    }
                    Some(Expectation::Hang) => parked.push(respond_to),
                    None => panic!("Unexpected request: no expectation left"),
                }
            }
        });

        Self {
            client: BridgeClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> BridgeClient<T> {
        self.client.clone()
    }

    /// Expects one more request.
    pub fn expect_call(&mut self) -> CallExpectationBuilder<T> {
        CallExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Drains the requests received so far, oldest first.
    pub fn take_requests(&self) -> Vec<T::Request> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single expected call.
pub struct CallExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> CallExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, reply: T::Reply) {
        self.push(Expectation::Reply(Ok(reply)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Expectation::Reply(Err(error)));
    }

    /// Accept the request but never answer it.
    pub fn hang(self) {
        self.push(Expectation::Hang);
    }

    fn push(self, expectation: Expectation<T>) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}
