//! Shared fixtures for action-hook integration tests.

#![allow(dead_code)]

use action_hooks::ClientApp;
use async_trait::async_trait;
use feedback::memory::MemorySink;
use mutation_runtime::{Config, Route, Session, SessionUser, Transport, TransportError};
use query_cache::QueryDescriptor;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Transport double recording every call; individual operations can be set to
/// fail.
pub struct MockTransport {
    calls: Mutex<Vec<(String, Value)>>,
    failing: Mutex<HashSet<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        })
    }

    pub fn fail_operation(&self, operation: &str) {
        self.failing.lock().unwrap().insert(operation.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, operation: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, input)| input)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, operation: &str, input: Value) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), input));
        if self.failing.lock().unwrap().contains(operation) {
            return Err(TransportError::rpc("INTERNAL", "database connection lost"));
        }
        Ok(json!({ "id": "created-1", "ok": true }))
    }
}

pub fn actor() -> SessionUser {
    SessionUser {
        id: "u1".into(),
        name: "ada".into(),
    }
}

pub fn authed_app(transport: Arc<MockTransport>, route: Route) -> (ClientApp, MemorySink) {
    init_tracing();
    let sink = MemorySink::new();
    let app = ClientApp::new(
        &Config::default(),
        transport,
        Arc::new(sink.clone()),
        Session::authenticated(actor()),
        route,
    );
    (app, sink)
}

pub fn anon_app(transport: Arc<MockTransport>, route: Route) -> (ClientApp, MemorySink) {
    init_tracing();
    let sink = MemorySink::new();
    let app = ClientApp::new(
        &Config::default(),
        transport,
        Arc::new(sink.clone()),
        Session::unauthenticated(),
        route,
    );
    (app, sink)
}

/// Populate entries so post-settlement staleness is observable.
pub fn seed(app: &ClientApp, descriptors: &[QueryDescriptor]) {
    for descriptor in descriptors {
        app.cache().set(descriptor, json!({ "seeded": true }));
    }
}

pub fn stale_set(app: &ClientApp, descriptors: &[QueryDescriptor]) -> Vec<bool> {
    descriptors
        .iter()
        .map(|descriptor| app.cache().is_stale(descriptor))
        .collect()
}

/// Let spawned fire-and-forget tasks (notification dispatch) run.
pub async fn settle_background_tasks() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
