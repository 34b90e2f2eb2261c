//! Like / unlike a tweet.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, InvalidationPlan, MutationSpec, ScreenKind, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct LikeAction {
    app: ClientApp,
    tweet_id: String,
    liked: AtomicBool,
    is_liking: AtomicBool,
    is_unliking: AtomicBool,
}

impl LikeAction {
    pub fn new(app: ClientApp, tweet_id: impl Into<String>) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
            liked: AtomicBool::new(false),
            is_liking: AtomicBool::new(false),
            is_unliking: AtomicBool::new(false),
        }
    }

    /// Local optimistic flag; not reset when the server call fails.
    pub fn liked(&self) -> bool {
        self.liked.load(Ordering::SeqCst)
    }

    pub fn is_liking(&self) -> bool {
        self.is_liking.load(Ordering::SeqCst)
    }

    pub fn is_unliking(&self) -> bool {
        self.is_unliking.load(Ordering::SeqCst)
    }

    fn hold_plan(&self) -> Vec<QueryDescriptor> {
        let params = self.app.navigator().params();
        let mut plan = InvalidationPlan::new()
            .always(queries::timeline())
            .always(queries::infinite_timeline());
        if let Some(status_id) = params.status_id.as_deref() {
            plan = plan.on(
                ScreenKind::TweetDetail,
                vec![
                    queries::tweet_replies(status_id),
                    queries::single_tweet(status_id),
                ],
            );
        }
        if let Some(user_id) = params.user_id.as_deref() {
            plan = plan.on(ScreenKind::Profile, vec![queries::user_tweets(user_id)]);
        }
        plan.resolve(self.app.navigator().screen())
    }

    fn invalidate_plan(&self) -> Vec<QueryDescriptor> {
        let params = self.app.navigator().params();
        let mut plan = InvalidationPlan::new()
            .always(queries::timeline())
            .always(queries::already_liked(&self.tweet_id))
            .always(queries::infinite_timeline());
        if let (Some(term), Some(filter)) = (
            params.search_term.as_deref(),
            params.search_filter.as_deref(),
        ) {
            plan = plan.on(ScreenKind::Search, vec![queries::search_tweets(term, filter)]);
        }
        if let Some(status_id) = params.status_id.as_deref() {
            plan = plan.on(
                ScreenKind::TweetDetail,
                vec![
                    queries::single_tweet(status_id),
                    queries::tweet_replies(status_id),
                ],
            );
        }
        if let Some(user_id) = params.user_id.as_deref() {
            plan = plan.on(ScreenKind::Profile, vec![queries::user_tweets(user_id)]);
        }
        plan = plan.on(ScreenKind::Bookmarks, vec![queries::user_bookmarks()]);
        if let Some(list_id) = params.list_id.as_deref() {
            plan = plan.on(ScreenKind::ListDetail, vec![queries::list_details(list_id)]);
        }
        plan = plan.on(
            ScreenKind::FollowingTimeline,
            vec![queries::following_timeline()],
        );
        plan.resolve(self.app.navigator().screen())
    }

    pub async fn like(&self) -> Settlement {
        self.liked.store(true, Ordering::SeqCst);
        self.is_liking.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "like",
                operation: "like.likeTweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold_plan(),
                invalidate: self.invalidate_plan(),
                messages: FeedbackMessages::new("Liking tweet", "Tweet liked"),
            })
            .await;
        self.is_liking.store(false, Ordering::SeqCst);
        settlement
    }

    pub async fn unlike(&self) -> Settlement {
        self.liked.store(false, Ordering::SeqCst);
        self.is_unliking.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "unlike",
                operation: "like.unlikeTweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold_plan(),
                invalidate: self.invalidate_plan(),
                messages: FeedbackMessages::new("Removing like", "Like removed"),
            })
            .await;
        self.is_unliking.store(false, Ordering::SeqCst);
        settlement
    }
}
