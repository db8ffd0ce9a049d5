//! Resolution sessions and supersession.
//!
//! Each search submission opens one session. Starting a new session cancels
//! the previous one, and every downstream continuation checks that its
//! token is still current before publishing or issuing its next request.
//! That check is the single invariant that keeps a slow, superseded query
//! from overwriting the results of a fresher one.

use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Proof of membership in one resolution session.
///
/// Tokens are compared by ID, never by identity. The embedded
/// [`CancellationToken`] is the session's abort signal: it is handed to
/// every transport call so the HTTP layer can stop in-flight work once the
/// session is superseded or torn down.
#[derive(Debug, Clone)]
pub struct SessionToken {
    id: u64,
    cancel: CancellationToken,
}

impl SessionToken {
    /// The abort signal to propagate into network calls.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    current: Option<ActiveSession>,
}

/// Issues session tokens and answers currency checks.
///
/// The "current session" reference inside is the only shared mutable state
/// in the pipeline; each session's ID is assigned once under the lock and
/// read-only afterwards. The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct SessionManager {
    inner: Mutex<Inner>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session, cancelling the previous in-flight one.
    pub fn begin(&self) -> SessionToken {
        let mut inner = self.inner.lock().unwrap();
        if let Some(previous) = inner.current.take() {
            tracing::trace!(superseded = previous.id, "cancelling previous session");
            previous.cancel.cancel();
        }
        inner.next_id += 1;
        let cancel = CancellationToken::new();
        inner.current = Some(ActiveSession {
            id: inner.next_id,
            cancel: cancel.clone(),
        });
        SessionToken {
            id: inner.next_id,
            cancel,
        }
    }

    /// Whether `token` belongs to the session that is still current.
    pub fn is_current(&self, token: &SessionToken) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.current.as_ref().is_some_and(|c| c.id == token.id)
    }

    /// Runs `f` only if `token` is still current, holding the session lock
    /// for the duration so no new session can begin in between.
    ///
    /// This is what makes the publish-time staleness check atomic: a
    /// superseding `begin` either happens before the check (and the check
    /// fails) or after `f` has completed.
    pub(crate) fn if_current<R>(&self, token: &SessionToken, f: impl FnOnce() -> R) -> Option<R> {
        let inner = self.inner.lock().unwrap();
        let current = inner.current.as_ref().is_some_and(|c| c.id == token.id);
        current.then(f)
    }

    /// Tears down the active session, if any (component unmount).
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(active) = inner.current.take() {
            tracing::debug!(session = active.id, "cancelling active session");
            active.cancel.cancel();
        }
    }
}
