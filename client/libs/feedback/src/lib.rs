//! Three-phase user feedback for mutations.
//!
//! Every mutation invocation owns exactly one feedback record: a `Loading`
//! message goes out before the network call, then exactly one of `Success` or
//! `Error` when it settles. Records share an id across phases so a UI can
//! replace the loading message in place.
//!
//! There is no timeout phase: a call that never settles leaves the loading
//! record in place.
//!
//! # Example
//!
//! ```
//! use feedback::{memory::MemorySink, FeedbackMessages, FeedbackPhase};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = MemorySink::new();
//! let messages = FeedbackMessages::new("Pinning tweet", "Tweet pinned");
//!
//! let result: Result<i32, String> =
//!     feedback::track(&sink, &messages, async { Ok(7) }).await;
//!
//! assert_eq!(result, Ok(7));
//! let emitted = sink.records();
//! assert_eq!(emitted[0].phase, FeedbackPhase::Loading);
//! assert_eq!(emitted[1].phase, FeedbackPhase::Success);
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

pub mod memory;

/// Lifecycle phase of a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackPhase {
    Loading,
    Success,
    Error,
}

/// One human-readable acknowledgment tied to a single mutation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub phase: FeedbackPhase,
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

impl Feedback {
    fn new(id: Uuid, phase: FeedbackPhase, message: impl Into<String>) -> Self {
        Self {
            id,
            phase,
            message: message.into(),
            emitted_at: Utc::now(),
        }
    }
}

/// Product copy for the three phases of one mutation.
#[derive(Debug, Clone)]
pub struct FeedbackMessages {
    pub loading: String,
    pub success: String,
    pub error_prefix: String,
}

impl FeedbackMessages {
    /// Messages with the stock error prefix.
    pub fn new(loading: impl Into<String>, success: impl Into<String>) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error_prefix: "Oops something went wrong".to_string(),
        }
    }

    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }
}

/// Where feedback records go. Implemented by UI plumbing; the memory sink
/// covers tests.
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, record: Feedback);
}

/// Sink forwarding records into an unbounded channel, for a UI event loop.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Feedback>,
}

impl ChannelSink {
    /// Build a sink plus the receiving half.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Feedback>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FeedbackSink for ChannelSink {
    fn emit(&self, record: Feedback) {
        // Receiver gone means the UI shut down; nothing useful to do.
        let _ = self.tx.send(record);
    }
}

/// Drive a mutation future through the loading -> success/error lifecycle.
///
/// The future's result passes through unchanged; the error is also rendered
/// into the error-phase message as `"<prefix> <cause>"`.
pub async fn track<S, F, T, E>(sink: &S, messages: &FeedbackMessages, fut: F) -> Result<T, E>
where
    S: FeedbackSink + ?Sized,
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let id = Uuid::new_v4();
    sink.emit(Feedback::new(id, FeedbackPhase::Loading, &messages.loading));
    debug!(feedback_id = %id, message = %messages.loading, "feedback loading");

    let result = fut.await;
    match &result {
        Ok(_) => {
            sink.emit(Feedback::new(id, FeedbackPhase::Success, &messages.success));
            debug!(feedback_id = %id, "feedback success");
        }
        Err(err) => {
            let message = format!("{} {}", messages.error_prefix, err);
            debug!(feedback_id = %id, message = %message, "feedback error");
            sink.emit(Feedback::new(id, FeedbackPhase::Error, message));
        }
    }
    result
}
