//! Follow / unfollow a user.

use crate::ClientApp;
use feedback::FeedbackMessages;
use mutation_runtime::{
    queries, InvalidationPlan, MutationSpec, NotificationRequest, ScreenKind, Settlement,
};
use query_cache::QueryDescriptor;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

/// View state and handlers for the follow button on a profile or user card.
pub struct FollowAction {
    app: ClientApp,
    /// The user being followed or unfollowed.
    user_id: String,
    followed: AtomicBool,
    following_user: AtomicBool,
    unfollowing_user: AtomicBool,
}

impl FollowAction {
    pub fn new(app: ClientApp, user_id: impl Into<String>) -> Self {
        Self {
            app,
            user_id: user_id.into(),
            followed: AtomicBool::new(false),
            following_user: AtomicBool::new(false),
            unfollowing_user: AtomicBool::new(false),
        }
    }

    /// Local optimistic flag. Flips synchronously on the handler call and is
    /// not reset when the server call fails.
    pub fn followed(&self) -> bool {
        self.followed.load(Ordering::SeqCst)
    }

    pub fn following_user(&self) -> bool {
        self.following_user.load(Ordering::SeqCst)
    }

    pub fn unfollowing_user(&self) -> bool {
        self.unfollowing_user.load(Ordering::SeqCst)
    }

    /// Follow edges touched by either sub-action: the recommendation list, the
    /// single-follower probe, and the target's profile everywhere; the
    /// followers/following lists only on their screens.
    fn plan(&self) -> Vec<QueryDescriptor> {
        let params = self.app.navigator().params();
        let owner = params.user_id.as_deref().unwrap_or(&self.user_id);
        InvalidationPlan::new()
            .always(queries::follower_recommendations())
            .always(queries::single_follower(&self.user_id))
            .always(queries::user_profile(&self.user_id))
            .on(
                ScreenKind::ProfileFollowers,
                vec![queries::user_followers(owner)],
            )
            .on(
                ScreenKind::ProfileFollowing,
                vec![queries::user_following(owner)],
            )
            .resolve(self.app.navigator().screen())
    }

    pub async fn follow(&self) -> Settlement {
        self.followed.store(true, Ordering::SeqCst);
        self.following_user.store(true, Ordering::SeqCst);

        let affected = self.plan();
        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "follow",
                operation: "follow.followUser",
                input: json!({ "followingId": self.user_id }),
                hold: affected.clone(),
                invalidate: affected,
                messages: FeedbackMessages::new("Loading...", "Following user"),
            })
            .await;
        self.following_user.store(false, Ordering::SeqCst);

        if settlement.is_applied() {
            if let Some(actor) = self.app.session().user() {
                self.app.notifier().dispatch(NotificationRequest {
                    text: format!("{} started following you", actor.name),
                    redirect_url: format!("/{}/{}", actor.id, actor.name),
                    recipient_id: self.user_id.clone(),
                });
            }
        }
        settlement
    }

    pub async fn unfollow(&self) -> Settlement {
        self.followed.store(false, Ordering::SeqCst);
        self.unfollowing_user.store(true, Ordering::SeqCst);

        let affected = self.plan();
        let settlement = self
            .app
            .runner()
            .run(MutationSpec {
                name: "unfollow",
                operation: "follow.unfollowUser",
                input: json!({ "followingId": self.user_id }),
                hold: affected.clone(),
                invalidate: affected,
                messages: FeedbackMessages::new("Unfollowing user", "User unfollowed"),
            })
            .await;
        self.unfollowing_user.store(false, Ordering::SeqCst);
        settlement
    }
}
