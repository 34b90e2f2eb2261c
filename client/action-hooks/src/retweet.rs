//! Retweet / undo retweet.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, InvalidationPlan, MutationSpec, ScreenKind, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct RetweetAction {
    app: ClientApp,
    tweet_id: String,
    has_retweeted: AtomicBool,
    is_retweeting: AtomicBool,
    is_undoing_retweet: AtomicBool,
}

impl RetweetAction {
    pub fn new(app: ClientApp, tweet_id: impl Into<String>) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
            has_retweeted: AtomicBool::new(false),
            is_retweeting: AtomicBool::new(false),
            is_undoing_retweet: AtomicBool::new(false),
        }
    }

    /// Local optimistic flag; not reset when the server call fails.
    pub fn has_retweeted(&self) -> bool {
        self.has_retweeted.load(Ordering::SeqCst)
    }

    pub fn is_retweeting(&self) -> bool {
        self.is_retweeting.load(Ordering::SeqCst)
    }

    pub fn is_undoing_retweet(&self) -> bool {
        self.is_undoing_retweet.load(Ordering::SeqCst)
    }

    /// Timelines held before dispatch: the ones a late refetch could clobber.
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
        if let Some(list_id) = params.list_id.as_deref() {
            plan = plan.on(ScreenKind::ListDetail, vec![queries::list_details(list_id)]);
        }
        plan = plan.on(
            ScreenKind::FollowingTimeline,
            vec![queries::following_timeline()],
        );
        plan.resolve(self.app.navigator().screen())
    }

    /// Everything a retweet can change, per screen.
    fn invalidate_plan(&self) -> Vec<QueryDescriptor> {
        let params = self.app.navigator().params();
        let mut plan = InvalidationPlan::new()
            .always(queries::timeline())
            .always(queries::already_retweeted(&self.tweet_id))
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

    pub async fn retweet(&self) -> Settlement {
        self.has_retweeted.store(true, Ordering::SeqCst);
        self.is_retweeting.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "retweet",
                operation: "tweet.createRetweet",
                input: json!({ "tweetId": self.tweet_id, "text": null, "mediaUrl": null }),
                hold: self.hold_plan(),
                invalidate: self.invalidate_plan(),
                messages: FeedbackMessages::new("Retweeting tweet", "Retweeted"),
            })
            .await;
        self.is_retweeting.store(false, Ordering::SeqCst);
        settlement
    }

    pub async fn undo_retweet(&self) -> Settlement {
        self.has_retweeted.store(false, Ordering::SeqCst);
        self.is_undoing_retweet.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "undo_retweet",
                operation: "tweet.undoRetweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold_plan(),
                invalidate: self.invalidate_plan(),
                messages: FeedbackMessages::new("Removing retweet", "Retweet removed"),
            })
            .await;
        self.is_undoing_retweet.store(false, Ordering::SeqCst);
        settlement
    }
}
