//! Pin / unpin a tweet on the acting user's profile.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, InvalidationPlan, MutationSpec, ScreenKind, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct PinAction {
    app: ClientApp,
    tweet_id: String,
    is_pinned: AtomicBool,
    is_busy: AtomicBool,
}

impl PinAction {
    pub fn new(app: ClientApp, tweet_id: impl Into<String>) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
            is_pinned: AtomicBool::new(false),
            is_busy: AtomicBool::new(false),
        }
    }

    /// Local optimistic flag; not reset when the server call fails. Only flips
    /// for an authenticated actor, so a gated attempt never shows the tweet as
    /// pinned.
    pub fn is_pinned(&self) -> bool {
        self.is_pinned.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy.load(Ordering::SeqCst)
    }

    /// The profile whose tweet list a pin reorders: the viewed profile when
    /// there is one, otherwise the acting user's own.
    fn profile_owner(&self) -> Option<String> {
        self.app
            .navigator()
            .params()
            .user_id
            .or_else(|| self.app.session().user().map(|user| user.id))
    }

    /// Pin holds only the profile tweet list; the invalidation set differs
    /// (infinite timeline everywhere, profile tweets on the profile screen).
    fn hold(&self) -> Vec<QueryDescriptor> {
        self.profile_owner()
            .map(|owner| vec![queries::user_tweets(&owner)])
            .unwrap_or_default()
    }

    fn invalidate(&self) -> Vec<QueryDescriptor> {
        let mut plan = InvalidationPlan::new().always(queries::infinite_timeline());
        if let Some(owner) = self.profile_owner() {
            plan = plan.on(ScreenKind::Profile, vec![queries::user_tweets(&owner)]);
        }
        plan.resolve(self.app.navigator().screen())
    }

    pub async fn pin(&self) -> Settlement {
        if self.app.session().is_authenticated() {
            self.is_pinned.store(true, Ordering::SeqCst);
        }
        self.is_busy.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "pin_tweet",
                operation: "tweet.pinTweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold(),
                invalidate: self.invalidate(),
                messages: FeedbackMessages::new("Pinning tweet", "Tweet pinned"),
            })
            .await;
        self.is_busy.store(false, Ordering::SeqCst);
        settlement
    }

    pub async fn unpin(&self) -> Settlement {
        if self.app.session().is_authenticated() {
            self.is_pinned.store(false, Ordering::SeqCst);
        }
        self.is_busy.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "unpin_tweet",
                operation: "tweet.unpinTweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold(),
                invalidate: self.invalidate(),
                messages: FeedbackMessages::new("Unpinning tweet", "Tweet unpinned"),
            })
            .await;
        self.is_busy.store(false, Ordering::SeqCst);
        settlement
    }
}
