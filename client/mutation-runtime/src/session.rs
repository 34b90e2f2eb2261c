//! Session status and the login prompt.
//!
//! The authorization gate is purely client-side: an unauthenticated actor
//! never reaches the transport, they get the login prompt instead. Server-side
//! enforcement belongs to the excluded RPC layer.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

/// The acting user, as far as the client knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
}

/// Authentication status of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(SessionUser),
    Unauthenticated,
}

/// Process-wide session handle.
pub struct Session {
    status: RwLock<AuthStatus>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self {
            status: RwLock::new(AuthStatus::Unauthenticated),
        }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            status: RwLock::new(AuthStatus::Authenticated(user)),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
            .read()
            .map(|status| status.clone())
            .unwrap_or(AuthStatus::Unauthenticated)
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<SessionUser> {
        match self.status() {
            AuthStatus::Authenticated(user) => Some(user),
            AuthStatus::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status(), AuthStatus::Authenticated(_))
    }

    pub fn sign_in(&self, user: SessionUser) {
        if let Ok(mut status) = self.status.write() {
            *status = AuthStatus::Authenticated(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut status) = self.status.write() {
            *status = AuthStatus::Unauthenticated;
        }
    }
}

/// Login modal surfaced when an unauthenticated actor attempts a protected
/// action. Tracks how many times it was opened so the "exactly once per
/// attempt" behavior stays observable.
#[derive(Default)]
pub struct LoginPrompt {
    visible: AtomicBool,
    opened: AtomicU64,
}

impl LoginPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.visible.store(true, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
    }

    pub fn dismiss(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Total number of times the prompt was opened.
    pub fn times_opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }
}
