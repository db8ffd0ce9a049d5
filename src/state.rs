//! Published result state and the session-gated publisher.
//!
//! Every externally visible transition of a resolution session goes
//! through [`StatePublisher::publish`], which applies a partial patch and
//! notifies the observer only while the issuing session is still current.
//! The staleness check runs exactly once per publish, atomically with the
//! patch, which is what gives the pipeline its race-safety guarantee
//! without any locking in the stages themselves.

use crate::records::{ChannelRecord, VideoRecord};
use crate::session::{SessionManager, SessionToken};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// The snapshot delivered to the observer after every publish.
///
/// For one session the view only ever advances: loading, then channel
/// metadata, then videos, then subscription status (or a terminal error).
/// Snapshots of two different sessions are never interleaved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultState {
    /// Display name of the channel being resolved (the query text until
    /// metadata arrives).
    pub channel_name: Option<String>,
    pub channel_id: Option<String>,
    /// Full channel metadata once a source produced it.
    pub channel: Option<ChannelRecord>,
    pub videos: Vec<VideoRecord>,
    /// Terminal, user-visible error; `None` while things are healthy.
    pub error: Option<String>,
    pub is_loading: bool,
    /// `None` means unknown (not signed in, or not yet hydrated).
    pub is_subscribed: Option<bool>,
    pub is_subscription_loading: bool,
}

/// The observer end of the pipeline: one snapshot per publish.
pub type StateObserver = mpsc::UnboundedSender<ResultState>;

/// Session-gated snapshot publisher.
#[derive(Debug)]
pub struct StatePublisher {
    sessions: Arc<SessionManager>,
    state: Mutex<ResultState>,
    observer: StateObserver,
}

impl StatePublisher {
    pub fn new(sessions: Arc<SessionManager>, observer: StateObserver) -> Self {
        Self {
            sessions,
            state: Mutex::new(ResultState::default()),
            observer,
        }
    }

    /// Applies `patch` to the session state and delivers the resulting
    /// snapshot, but only if `token` still belongs to the current session.
    ///
    /// Returns whether the patch was applied. A stale publish is a no-op:
    /// no state change, no observer call, no error.
    pub fn publish(&self, token: &SessionToken, patch: impl FnOnce(&mut ResultState)) -> bool {
        let mut state = self.state.lock().unwrap();
        let snapshot = self.sessions.if_current(token, || {
            patch(&mut state);
            state.clone()
        });
        drop(state);

        match snapshot {
            Some(snapshot) => {
                // The UI side owns the receiver; if it is gone there is
                // nobody left to render for, which is fine.
                let _ = self.observer.send(snapshot);
                true
            }
            None => {
                tracing::trace!("dropping publish from superseded session");
                false
            }
        }
    }

    /// The latest snapshot, regardless of which session produced it.
    pub fn current_state(&self) -> ResultState {
        self.state.lock().unwrap().clone()
    }
}
