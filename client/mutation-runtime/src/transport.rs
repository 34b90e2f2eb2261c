//! RPC seam between the data layer and the wire.

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// Named query/mutation operations over a structured input. The concrete
/// implementation (HTTP, in-process, test double) is injected at wiring time.
///
/// No retry and no timeout live at this seam: a hung call hangs its caller,
/// which is exactly how the feedback lifecycle makes it visible.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, operation: &str, input: Value) -> Result<Value, TransportError>;
}
