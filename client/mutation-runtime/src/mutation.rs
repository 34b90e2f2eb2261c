//! The optimistic-mutation wrapper.
//!
//! Every server-mutating action goes through [`MutationRunner::run`] with the
//! same contract:
//!
//! 1. authorization gate — unauthenticated actors get the login prompt and
//!    never reach the cache or the transport;
//! 2. pre-action hold — cancel in-flight reads for each held descriptor,
//!    snapshot it, and write the snapshot back unchanged (a data no-op whose
//!    only effect is the cancellation);
//! 3. dispatch — the transport call drives the loading/success/error feedback
//!    lifecycle;
//! 4. settlement — every descriptor in the invalidate set is marked stale
//!    exactly once, success or failure alike.
//!
//! The perceived immediacy comes from the loading feedback and the local flags
//! the action hooks flip, not from a computed provisional value.

use crate::error::MutationError;
use crate::session::{LoginPrompt, Session};
use crate::transport::Transport;
use feedback::{FeedbackMessages, FeedbackSink};
use query_cache::{QueryCache, QueryDescriptor};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// One mutation invocation, fully described as data.
#[derive(Debug, Clone)]
pub struct MutationSpec {
    /// Action name for logging.
    pub name: &'static str,
    /// Transport operation to invoke.
    pub operation: &'static str,
    pub input: Value,
    /// Descriptors cancelled and snapshot-held before dispatch.
    pub hold: Vec<QueryDescriptor>,
    /// Descriptors invalidated after settlement.
    pub invalidate: Vec<QueryDescriptor>,
    pub messages: FeedbackMessages,
}

/// Outcome of a mutation invocation once it settled (or short-circuited).
#[derive(Debug)]
pub enum Settlement {
    /// Primary call succeeded; carries the server's result.
    Applied(Value),
    /// Primary call failed; the error was already surfaced via feedback.
    Failed(MutationError),
    /// Actor was unauthenticated; the login prompt was opened instead.
    LoginRequired,
}

impl Settlement {
    pub fn is_applied(&self) -> bool {
        matches!(self, Settlement::Applied(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Settlement::Applied(value) => Some(value),
            _ => None,
        }
    }
}

/// Shared per-session wiring every action hook runs its mutations through.
pub struct MutationRunner {
    cache: Arc<QueryCache>,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    login_prompt: Arc<LoginPrompt>,
    feedback: Arc<dyn FeedbackSink>,
}

impl MutationRunner {
    pub fn new(
        cache: Arc<QueryCache>,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        login_prompt: Arc<LoginPrompt>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            cache,
            transport,
            session,
            login_prompt,
            feedback,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn login_prompt(&self) -> &Arc<LoginPrompt> {
        &self.login_prompt
    }

    /// Run one mutation through the full gate/hold/dispatch/settle contract.
    pub async fn run(&self, spec: MutationSpec) -> Settlement {
        if !self.session.is_authenticated() {
            debug!(action = spec.name, "unauthenticated, opening login prompt");
            self.login_prompt.open();
            return Settlement::LoginRequired;
        }

        self.hold(&spec.hold);

        debug!(action = spec.name, operation = spec.operation, "dispatching mutation");
        let result = feedback::track(
            self.feedback.as_ref(),
            &spec.messages,
            self.transport.call(spec.operation, spec.input.clone()),
        )
        .await;

        // Settlement: always refetch after error or success.
        for descriptor in &spec.invalidate {
            self.cache.invalidate(descriptor);
        }

        match result {
            Ok(value) => {
                debug!(action = spec.name, "mutation applied");
                Settlement::Applied(value)
            }
            Err(err) => {
                warn!(action = spec.name, error = %err, "mutation failed");
                Settlement::Failed(MutationError::Transport(err))
            }
        }
    }

    /// Cancel outgoing refetches so they don't overwrite the optimistic state,
    /// then write each existing snapshot back unchanged.
    fn hold(&self, descriptors: &[QueryDescriptor]) {
        for descriptor in descriptors {
            self.cache.cancel(descriptor);
            if let Some(snapshot) = self.cache.get(descriptor) {
                self.cache.set(descriptor, snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::queries;
    use crate::session::SessionUser;
    use async_trait::async_trait;
    use feedback::memory::MemorySink;
    use feedback::FeedbackPhase;
    use serde_json::json;
    use std::sync::Mutex;

    struct StubTransport {
        calls: Mutex<Vec<(String, Value)>>,
        fail: bool,
    }

    impl StubTransport {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn call(&self, operation: &str, input: Value) -> Result<Value, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((operation.to_string(), input));
            if self.fail {
                Err(TransportError::rpc("INTERNAL", "boom"))
            } else {
                Ok(json!({ "ok": true }))
            }
        }
    }

    struct Fixture {
        runner: MutationRunner,
        transport: Arc<StubTransport>,
        sink: MemorySink,
    }

    fn fixture(authenticated: bool, fail: bool) -> Fixture {
        let session = if authenticated {
            Session::authenticated(SessionUser {
                id: "u1".into(),
                name: "ada".into(),
            })
        } else {
            Session::unauthenticated()
        };
        let transport = Arc::new(StubTransport::new(fail));
        let sink = MemorySink::new();
        let runner = MutationRunner::new(
            Arc::new(QueryCache::new()),
            transport.clone(),
            Arc::new(session),
            Arc::new(LoginPrompt::new()),
            Arc::new(sink.clone()),
        );
        Fixture {
            runner,
            transport,
            sink,
        }
    }

    fn spec() -> MutationSpec {
        MutationSpec {
            name: "follow",
            operation: "follow.followUser",
            input: json!({ "followingId": "u2" }),
            hold: vec![queries::follower_recommendations()],
            invalidate: vec![
                queries::follower_recommendations(),
                queries::single_follower("u2"),
            ],
            messages: FeedbackMessages::new("Loading...", "Following user"),
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_short_circuits() {
        let fx = fixture(false, false);
        fx.runner
            .cache()
            .set(&queries::follower_recommendations(), json!(["seed"]));

        let settlement = fx.runner.run(spec()).await;

        assert!(matches!(settlement, Settlement::LoginRequired));
        assert!(fx.transport.calls().is_empty());
        assert_eq!(fx.runner.login_prompt().times_opened(), 1);
        assert!(fx.sink.records().is_empty());
        // Gate runs before any cache mutation
        assert!(!fx.runner.cache().is_stale(&queries::follower_recommendations()));
        assert_eq!(fx.runner.cache().stats().invalidations, 0);
    }

    #[tokio::test]
    async fn test_success_invalidates_once_after_settlement() {
        let fx = fixture(true, false);
        let mut events = fx.runner.cache().subscribe();

        let settlement = fx.runner.run(spec()).await;

        assert!(settlement.is_applied());
        assert_eq!(settlement.value().unwrap(), &json!({ "ok": true }));
        assert_eq!(fx.transport.calls().len(), 1);
        assert_eq!(fx.transport.calls()[0].0, "follow.followUser");

        // Exactly one invalidation pass over the declared set
        assert_eq!(fx.runner.cache().stats().invalidations, 2);
        let mut invalidated = Vec::new();
        while let Ok(event) = events.try_recv() {
            let query_cache::CacheEvent::Invalidated(d) = event;
            invalidated.push(d);
        }
        assert_eq!(
            invalidated,
            vec![
                queries::follower_recommendations(),
                queries::single_follower("u2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_still_invalidates_and_surfaces_error() {
        let fx = fixture(true, true);

        let settlement = fx.runner.run(spec()).await;

        assert!(matches!(settlement, Settlement::Failed(_)));
        assert_eq!(fx.runner.cache().stats().invalidations, 2);

        let errors = fx.sink.in_phase(FeedbackPhase::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Oops something went wrong INTERNAL: boom");
    }

    #[tokio::test]
    async fn test_feedback_lifecycle_order() {
        let fx = fixture(true, false);
        fx.runner.run(spec()).await;

        let records = fx.sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phase, FeedbackPhase::Loading);
        assert_eq!(records[1].phase, FeedbackPhase::Success);
    }

    #[tokio::test]
    async fn test_hold_restores_snapshot_byte_for_byte() {
        let fx = fixture(true, false);
        let d = queries::follower_recommendations();
        let seed = json!([{ "id": "u9", "name": "grace" }]);
        fx.runner.cache().set(&d, seed.clone());
        let before = serde_json::to_vec(&fx.runner.cache().get(&d).unwrap()).unwrap();

        fx.runner.run(spec()).await;

        let after = serde_json::to_vec(&fx.runner.cache().get(&d).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_hold_cancels_in_flight_fetch() {
        let fx = fixture(true, false);
        let d = queries::follower_recommendations();
        fx.runner.cache().set(&d, json!("snapshot"));

        let ticket = fx.runner.cache().begin_fetch(&d);
        fx.runner.run(spec()).await;

        // The late response must not clobber the held snapshot
        assert!(!fx.runner.cache().complete_fetch(ticket, json!("late")));
        assert_eq!(fx.runner.cache().get(&d), Some(json!("snapshot")));
    }

    #[tokio::test]
    async fn test_hold_skips_missing_snapshots() {
        let fx = fixture(true, false);
        fx.runner.run(spec()).await;
        // No snapshot existed, so the optimistic step wrote nothing
        assert_eq!(fx.runner.cache().get(&queries::follower_recommendations()), None);
    }
}
