//! Per-feature view-state hooks over the mutation runtime.
//!
//! Each action exposes local flags, per-sub-action busy booleans, and async
//! handlers safe to bind straight to a click. Handlers are idempotent from the
//! caller's side but not at the protocol level; the only double-submit
//! protection is the busy flag a control is expected to disable on.
//!
//! # Example
//!
//! ```no_run
//! use action_hooks::{ClientApp, FollowAction};
//! use feedback::ChannelSink;
//! use mutation_runtime::{Config, Route, Session, SessionUser};
//! use std::sync::Arc;
//!
//! # async fn demo(transport: Arc<dyn mutation_runtime::Transport>) {
//! let (sink, _feedback_rx) = ChannelSink::channel();
//! let app = ClientApp::new(
//!     &Config::default(),
//!     transport,
//!     Arc::new(sink),
//!     Session::authenticated(SessionUser { id: "u1".into(), name: "ada".into() }),
//!     Route::home(),
//! );
//!
//! let follow = FollowAction::new(app.clone(), "u2");
//! follow.follow().await;
//! assert!(follow.followed());
//! # }
//! ```

use feedback::FeedbackSink;
use mutation_runtime::{
    Config, LoginPrompt, MutationRunner, Navigator, Notifier, Route, Session, Transport,
};
use query_cache::QueryCache;
use std::sync::Arc;
use tracing::info;

mod bookmark;
mod delete;
mod follow;
mod like;
mod pin;
mod poll;
mod reply;
mod retweet;
mod vote;

pub use bookmark::BookmarkAction;
pub use delete::DeleteTweetAction;
pub use follow::FollowAction;
pub use like::LikeAction;
pub use pin::PinAction;
pub use poll::PollComposer;
pub use reply::ReplyAction;
pub use retweet::RetweetAction;
pub use vote::VoteAction;

/// Shared wiring behind every action hook: the cache, the session, the login
/// prompt, navigation, the mutation runner, and the notifier. Cloning shares
/// the same underlying state.
#[derive(Clone)]
pub struct ClientApp {
    cache: Arc<QueryCache>,
    session: Arc<Session>,
    login_prompt: Arc<LoginPrompt>,
    navigator: Arc<Navigator>,
    runner: Arc<MutationRunner>,
    notifier: Notifier,
}

impl ClientApp {
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        feedback: Arc<dyn FeedbackSink>,
        session: Session,
        initial_route: Route,
    ) -> Self {
        info!(env = %config.app.env, "initializing client data layer");

        let cache = Arc::new(QueryCache::new());
        let session = Arc::new(session);
        let login_prompt = Arc::new(LoginPrompt::new());
        let navigator = Arc::new(Navigator::new(initial_route));
        let runner = Arc::new(MutationRunner::new(
            cache.clone(),
            transport.clone(),
            session.clone(),
            login_prompt.clone(),
            feedback,
        ));
        let notifier = Notifier::new(transport, config.notifications.enabled);

        Self {
            cache,
            session,
            login_prompt,
            navigator,
            runner,
            notifier,
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

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn runner(&self) -> &Arc<MutationRunner> {
        &self.runner
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
