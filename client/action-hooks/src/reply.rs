//! Reply to a tweet.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, MutationSpec, NotificationRequest, Route, Settlement};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct ReplyAction {
    app: ClientApp,
    tweet_id: String,
    /// Author of the tweet being replied to; replies to your own tweet send
    /// no notification.
    tweet_author_id: String,
    is_replying: AtomicBool,
}

impl ReplyAction {
    pub fn new(
        app: ClientApp,
        tweet_id: impl Into<String>,
        tweet_author_id: impl Into<String>,
    ) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
            tweet_author_id: tweet_author_id.into(),
            is_replying: AtomicBool::new(false),
        }
    }

    pub fn is_replying(&self) -> bool {
        self.is_replying.load(Ordering::SeqCst)
    }

    /// Submit a reply. Hashtags are extracted from the text client-side; on
    /// success the tweet author is notified (unless replying to yourself) and
    /// the user lands on the tweet's detail page.
    pub async fn reply(&self, text: &str, media_url: Option<String>) -> Settlement {
        self.is_replying.store(true, Ordering::SeqCst);

        let replies = queries::tweet_replies(&self.tweet_id);
        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "reply",
                operation: "tweet.createReply",
                input: json!({
                    "text": text,
                    "mediaUrl": media_url,
                    "tweetId": self.tweet_id,
                    "hashtags": extract_hashtags(text),
                }),
                hold: vec![replies.clone()],
                invalidate: vec![replies],
                messages: FeedbackMessages::new("Replying tweet", "Tweet replied"),
            })
            .await;
        self.is_replying.store(false, Ordering::SeqCst);

        if let Settlement::Applied(created) = &settlement {
            if let Some(actor) = self.app.session().user() {
                if actor.id != self.tweet_author_id {
                    let reply_id = created
                        .get("id")
                        .and_then(Value::as_str)
                        .unwrap_or(&self.tweet_id);
                    self.app.notifier().dispatch(NotificationRequest {
                        text: format!("{} just replied on your tweet", actor.name),
                        redirect_url: format!("/status/{}", reply_id),
                        recipient_id: self.tweet_author_id.clone(),
                    });
                }
            }
            self.app
                .navigator()
                .navigate(Route::tweet_detail(&self.tweet_id));
        }
        settlement
    }
}

/// Words starting with `#`, with the marker stripped; a bare `#` is ignored.
fn extract_hashtags(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|word| word.strip_prefix('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
