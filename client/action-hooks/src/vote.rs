//! Vote on a poll option.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, InvalidationPlan, MutationSpec, ScreenKind, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct VoteAction {
    app: ClientApp,
    option_id: String,
    is_voting: AtomicBool,
}

impl VoteAction {
    pub fn new(app: ClientApp, option_id: impl Into<String>) -> Self {
        Self {
            app,
            option_id: option_id.into(),
            is_voting: AtomicBool::new(false),
        }
    }

    pub fn is_voting(&self) -> bool {
        self.is_voting.load(Ordering::SeqCst)
    }

    /// Poll results render inside the timeline on Home and inside the tweet on
    /// its detail page; only the screen actually showing them is refetched.
    fn invalidate(&self) -> Vec<QueryDescriptor> {
        let params = self.app.navigator().params();
        let mut plan =
            InvalidationPlan::new().on(ScreenKind::Home, vec![queries::infinite_timeline()]);
        if let Some(status_id) = params.status_id.as_deref() {
            plan = plan.on(ScreenKind::TweetDetail, vec![queries::single_tweet(status_id)]);
        }
        plan.resolve(self.app.navigator().screen())
    }

    pub async fn vote(&self) -> Settlement {
        self.is_voting.store(true, Ordering::SeqCst);

        let user_id = self
            .app
            .session()
            .user()
            .map(|user| user.id)
            .unwrap_or_default();
        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "vote",
                operation: "vote.voteOption",
                input: json!({ "userId": user_id, "optionId": self.option_id }),
                hold: vec![queries::infinite_timeline()],
                invalidate: self.invalidate(),
                messages: FeedbackMessages::new("Voting poll", "Poll voted"),
            })
            .await;
        self.is_voting.store(false, Ordering::SeqCst);
        settlement
    }
}
