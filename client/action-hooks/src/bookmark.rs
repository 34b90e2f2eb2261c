//! Bookmark / unbookmark a tweet.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{queries, MutationSpec, Route, Settlement};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct BookmarkAction {
    app: ClientApp,
    tweet_id: String,
    bookmark_added: AtomicBool,
    is_creating: AtomicBool,
    is_deleting: AtomicBool,
}

impl BookmarkAction {
    pub fn new(app: ClientApp, tweet_id: impl Into<String>) -> Self {
        Self {
            app,
            tweet_id: tweet_id.into(),
            bookmark_added: AtomicBool::new(false),
            is_creating: AtomicBool::new(false),
            is_deleting: AtomicBool::new(false),
        }
    }

    /// Local optimistic flag; not reset when the server call fails. Unlike
    /// follow and retweet, it only flips for an authenticated actor, so a
    /// gated attempt never shows the tweet as bookmarked.
    pub fn bookmark_added(&self) -> bool {
        self.bookmark_added.load(Ordering::SeqCst)
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating.load(Ordering::SeqCst)
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting.load(Ordering::SeqCst)
    }

    /// Bookmarks are screen-independent: the same two descriptors are held on
    /// every route, and only the bookmark list is refetched afterwards.
    fn hold(&self) -> Vec<QueryDescriptor> {
        vec![
            queries::user_bookmarks(),
            queries::already_bookmarked(&self.tweet_id),
        ]
    }

    /// Create the bookmark and, on success, redirect to the bookmarks screen.
    pub async fn create(&self) -> Settlement {
        if self.app.session().is_authenticated() {
            self.bookmark_added.store(true, Ordering::SeqCst);
        }
        self.is_creating.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "create_bookmark",
                operation: "bookmark.createBookmark",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold(),
                invalidate: vec![queries::user_bookmarks()],
                messages: FeedbackMessages::new("Creating bookmark", "Bookmark created"),
            })
            .await;
        self.is_creating.store(false, Ordering::SeqCst);

        if settlement.is_applied() {
            self.app.navigator().navigate(Route::bookmarks());
        }
        settlement
    }

    pub async fn delete(&self) -> Settlement {
        if self.app.session().is_authenticated() {
            self.bookmark_added.store(false, Ordering::SeqCst);
        }
        self.is_deleting.store(true, Ordering::SeqCst);

        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "delete_bookmark",
                operation: "bookmark.deleteBookmark",
                input: json!({ "tweetId": self.tweet_id }),
                hold: self.hold(),
                invalidate: vec![queries::user_bookmarks()],
                messages: FeedbackMessages::new("Deleting bookmark", "Bookmark deleted"),
            })
            .await;
        self.is_deleting.store(false, Ordering::SeqCst);
        settlement
    }
}
