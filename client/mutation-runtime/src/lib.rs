//! Runtime for the client data layer: session gate, navigation, transport
//! seam, invalidation tables, the optimistic-mutation wrapper, and the
//! fire-and-forget notification side-effect.

pub mod config;
pub mod error;
pub mod invalidation;
pub mod mutation;
pub mod navigation;
pub mod notify;
pub mod queries;
pub mod session;
pub mod transport;

pub use config::Config;
pub use error::{MutationError, TransportError};
pub use invalidation::InvalidationPlan;
pub use mutation::{MutationRunner, MutationSpec, Settlement};
pub use navigation::{Navigator, Route, RouteParams, ScreenKind};
pub use notify::{NotificationRequest, Notifier};
pub use session::{AuthStatus, LoginPrompt, Session, SessionUser};
pub use transport::Transport;
