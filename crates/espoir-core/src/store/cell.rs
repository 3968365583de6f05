// ── Shared reactive state cell ──
//
// Single owner of the published `AppState`. Every mutation is a pure
// transition executed under the watch channel's internal lock via
// `send_modify`, so two transitions never interleave and subscribers
// only ever observe fully consistent snapshots. No transition may
// suspend -- I/O belongs between transitions, in the stores.

use std::sync::Arc;

use tokio::sync::watch;

use crate::state::AppState;

pub(crate) struct StateCell {
    state: watch::Sender<Arc<AppState>>,
    /// Publish counter, bumped once per applied transition.
    version: watch::Sender<u64>,
}

impl StateCell {
    pub(crate) fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        let (version, _) = watch::channel(0u64);
        Self { state, version }
    }

    /// Apply a pure transition and publish the resulting snapshot.
    pub(crate) fn apply<F>(&self, transition: F)
    where
        F: FnOnce(&AppState) -> AppState,
    {
        self.apply_with(|state| (transition(state), ()));
    }

    /// Apply a transition that also computes a value under the publish
    /// lock (e.g. the favorites set captured for the follow-up write).
    pub(crate) fn apply_with<F, R>(&self, transition: F) -> R
    where
        F: FnOnce(&AppState) -> (AppState, R),
    {
        let mut out = None;
        // `send_modify` updates unconditionally, even with zero receivers,
        // and serializes concurrent transitions.
        self.state.send_modify(|current| {
            let (next, value) = transition(current);
            *current = Arc::new(next);
            out = Some(value);
        });
        self.version.send_modify(|v| *v += 1);
        out.expect("transition ran")
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    ///
    /// The receiver starts with the current value already marked seen, so
    /// a subscriber observes only snapshots published after registration.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }
}
