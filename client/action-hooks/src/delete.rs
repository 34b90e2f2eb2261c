//! Delete a tweet.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, InvalidationPlan, MutationSpec, Route, ScreenKind, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;

/// Handler for the delete entry of a tweet's menu. No local flag: the tweet
/// disappears via the refetch its invalidations schedule.
pub struct DeleteTweetAction {
    app: ClientApp,
    tweet_id: String,
}

impl DeleteTweetAction {
    pub fn new(app: ClientApp, tweet_id: impl Into<String>) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
        }
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
            .always(queries::infinite_timeline());
        if let Some(user_id) = params.user_id.as_deref() {
            plan = plan.on(ScreenKind::Profile, vec![queries::user_tweets(user_id)]);
        }
        if let Some(status_id) = params.status_id.as_deref() {
            plan = plan.on(
                ScreenKind::TweetDetail,
                vec![
                    queries::tweet_replies(status_id),
                    queries::single_tweet(status_id),
                ],
            );
        }
        if let (Some(term), Some(filter)) = (
            params.search_term.as_deref(),
            params.search_filter.as_deref(),
        ) {
            plan = plan.on(ScreenKind::Search, vec![queries::search_tweets(term, filter)]);
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

    /// Delete the tweet. When issued from the tweet's own detail page, the
    /// user is sent home after settlement whether or not the call succeeded.
    pub async fn delete(&self) -> Settlement {
        let on_detail_page = self.app.navigator().screen() == ScreenKind::TweetDetail;

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "delete_tweet",
                operation: "tweet.deleteTweet",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold_plan(),
                invalidate: self.invalidate_plan(),
                messages: FeedbackMessages::new("Deleting tweet", "Tweet deleted"),
            })
            .await;

        if on_detail_page && !matches!(settlement, Settlement::LoginRequired) {
            self.app.navigator().navigate(Route::home());
        }
        settlement
    }
}
