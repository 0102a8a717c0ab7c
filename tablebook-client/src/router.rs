//! Access routing
//!
//! Maps a session snapshot to the navigation root the presentation layer
//! is allowed to show.

use tokio::sync::watch;

use crate::session::Session;

/// Top-level navigation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootArea {
    Unauthenticated,
    Admin,
    User,
}

/// Pure routing rule. Only the token and the role are consulted.
pub fn route(session: &Session) -> RootArea {
    if session.token().is_none() {
        return RootArea::Unauthenticated;
    }
    match session.user() {
        Some(user) if user.role.is_admin() => RootArea::Admin,
        _ => RootArea::User,
    }
}

/// Re-evaluates [`route`] on every session mutation.
#[derive(Debug, Clone)]
pub struct AccessRouter {
    rx: watch::Receiver<Session>,
}

impl AccessRouter {
    pub fn new(rx: watch::Receiver<Session>) -> Self {
        Self { rx }
    }

    /// Route for the session as it is right now.
    pub fn current(&self) -> RootArea {
        route(&self.rx.borrow())
    }

    /// Waits for the next session mutation and returns the route it implies.
    ///
    /// Every mutation yields a value, even when the route is unchanged.
    /// Returns `None` once the session owner has been dropped.
    pub async fn next_change(&mut self) -> Option<RootArea> {
        self.rx.changed().await.ok()?;
        let area = route(&self.rx.borrow_and_update());
        tracing::debug!(?area, "Route re-evaluated");
        Some(area)
    }
}
