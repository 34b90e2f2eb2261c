//! Navigation location, resolved once into a logical screen.
//!
//! Post-settlement invalidation is route-dependent: the same action issued on
//! different screens touches different descriptors. Screen resolution happens
//! here, at route construction, so the mutation wrapper and the invalidation
//! tables deal in a plain [`ScreenKind`] instead of re-deriving path patterns
//! per call site.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, RwLock};

/// Logical screen identifier, the key of every invalidation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenKind {
    Home,
    Search,
    Bookmarks,
    FollowingTimeline,
    TweetDetail,
    Profile,
    ProfileFollowers,
    ProfileFollowing,
    ListDetail,
    Other,
}

/// Route and query parameters a screen may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Tweet id on `/status/<statusId>`.
    pub status_id: Option<String>,
    /// Owner of the viewed profile or list.
    pub user_id: Option<String>,
    pub username: Option<String>,
    /// List id on `/list/<userId>/<listId>`.
    pub list_id: Option<String>,
    /// `q` query parameter on `/search`.
    pub search_term: Option<String>,
    /// `f` query parameter on `/search`.
    pub search_filter: Option<String>,
}

/// One navigation location: concrete path, resolved screen, parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    path: String,
    screen: ScreenKind,
    params: RouteParams,
}

impl Route {
    pub fn home() -> Self {
        Self {
            path: "/".into(),
            screen: ScreenKind::Home,
            params: RouteParams::default(),
        }
    }

    pub fn search(term: impl Into<String>, filter: impl Into<String>) -> Self {
        let term = term.into();
        let filter = filter.into();
        Self {
            path: format!("/search?q={}&f={}", term, filter),
            screen: ScreenKind::Search,
            params: RouteParams {
                search_term: Some(term),
                search_filter: Some(filter),
                ..Default::default()
            },
        }
    }

    pub fn bookmarks() -> Self {
        Self {
            path: "/bookmarks".into(),
            screen: ScreenKind::Bookmarks,
            params: RouteParams::default(),
        }
    }

    /// Timeline of tweets from followed users.
    pub fn following_timeline() -> Self {
        Self {
            path: "/following".into(),
            screen: ScreenKind::FollowingTimeline,
            params: RouteParams::default(),
        }
    }

    pub fn tweet_detail(status_id: impl Into<String>) -> Self {
        let status_id = status_id.into();
        Self {
            path: format!("/status/{}", status_id),
            screen: ScreenKind::TweetDetail,
            params: RouteParams {
                status_id: Some(status_id),
                ..Default::default()
            },
        }
    }

    pub fn profile(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let username = username.into();
        Self {
            path: format!("/{}/{}", user_id, username),
            screen: ScreenKind::Profile,
            params: RouteParams {
                user_id: Some(user_id),
                username: Some(username),
                ..Default::default()
            },
        }
    }

    pub fn profile_followers(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let username = username.into();
        Self {
            path: format!("/{}/{}/followers", user_id, username),
            screen: ScreenKind::ProfileFollowers,
            params: RouteParams {
                user_id: Some(user_id),
                username: Some(username),
                ..Default::default()
            },
        }
    }

    pub fn profile_following(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let username = username.into();
        Self {
            path: format!("/{}/{}/following", user_id, username),
            screen: ScreenKind::ProfileFollowing,
            params: RouteParams {
                user_id: Some(user_id),
                username: Some(username),
                ..Default::default()
            },
        }
    }

    pub fn list_detail(user_id: impl Into<String>, list_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let list_id = list_id.into();
        Self {
            path: format!("/list/{}/{}", user_id, list_id),
            screen: ScreenKind::ListDetail,
            params: RouteParams {
                user_id: Some(user_id),
                list_id: Some(list_id),
                ..Default::default()
            },
        }
    }

    /// Anything the data layer has no table for.
    pub fn other(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            screen: ScreenKind::Other,
            params: RouteParams::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn screen(&self) -> ScreenKind {
        self.screen
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }
}

/// Current location plus a record of redirects the data layer issued.
///
/// The data layer never mutates navigation except to redirect after certain
/// mutations (delete from a detail page, bookmark creation, reply).
pub struct Navigator {
    current: RwLock<Route>,
    redirects: Mutex<Vec<String>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            current: RwLock::new(initial),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Route {
        self.current
            .read()
            .map(|route| route.clone())
            .unwrap_or_else(|_| Route::home())
    }

    pub fn screen(&self) -> ScreenKind {
        self.current().screen()
    }

    pub fn params(&self) -> RouteParams {
        self.current().params().clone()
    }

    /// Redirect to a new location, recording the push.
    pub fn navigate(&self, route: Route) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(route.path().to_string());
        }
        if let Ok(mut current) = self.current.write() {
            *current = route;
        }
    }

    /// Move the user without recording a redirect (user-initiated navigation).
    pub fn set_location(&self, route: Route) {
        if let Ok(mut current) = self.current.write() {
            *current = route;
        }
    }

    /// Paths pushed by the data layer, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|redirects| redirects.clone())
            .unwrap_or_default()
    }
}
