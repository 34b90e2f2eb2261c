//! Fire-and-forget notification side-effect.
//!
//! Certain mutations (follow, reply) create a notification for the affected
//! user after the primary call succeeds. The dispatch is an explicit spawned
//! task: its failure is logged and counted, never surfaced to the user, never
//! retried, and never rolls back the primary action.

use crate::transport::Transport;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const SEND_NOTIFICATION: &str = "notification.sendNotification";

/// Payload of the notification-creation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub text: String,
    /// Where the notification links to, e.g. `/<actorId>/<actorName>`.
    pub redirect_url: String,
    pub recipient_id: String,
}

/// Dispatches best-effort notification calls in the background.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn Transport>,
    enabled: bool,
    failures: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn Transport>, enabled: bool) -> Self {
        Self {
            transport,
            enabled,
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn the notification call. The handle is returned so tests can await
    /// completion; production call sites drop it.
    pub fn dispatch(&self, request: NotificationRequest) -> JoinHandle<()> {
        let transport = self.transport.clone();
        let failures = self.failures.clone();
        let enabled = self.enabled;
        tokio::spawn(async move {
            if !enabled {
                debug!(recipient_id = %request.recipient_id, "notifications disabled, skipping");
                return;
            }
            let input = json!({
                "text": request.text,
                "redirectUrl": request.redirect_url,
                "recipientId": request.recipient_id,
            });
            match transport.call(SEND_NOTIFICATION, input).await {
                Ok(_) => {
                    debug!(recipient_id = %request.recipient_id, "notification sent");
                }
                Err(err) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        recipient_id = %request.recipient_id,
                        error = %err,
                        "notification dispatch failed"
                    );
                }
            }
        })
    }

    /// Number of dispatches that failed since startup.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
