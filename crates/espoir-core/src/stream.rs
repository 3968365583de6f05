// ── Reactive state stream ──
//
// Subscription type for consuming published `AppState` snapshots.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::AppState;

/// A subscription to the published state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or conversion to a `Stream`. A
/// subscription observes only snapshots published after it was created.
pub struct StateStream {
    current: Arc<AppState>,
    receiver: watch::Receiver<Arc<AppState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<AppState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at subscription time.
    pub fn current(&self) -> &Arc<AppState> {
        &self.current
    }

    /// The latest published snapshot (may be newer than `current`).
    pub fn latest(&self) -> Arc<AppState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publish, returning the new snapshot.
    /// Returns `None` once the container has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<AppState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// Built with `from_changes` so the in-progress snapshot is not
    /// replayed: the first item is the first publish after conversion.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::from_changes(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new `Arc<AppState>` each time a transition is published.
/// Intermediate snapshots may be conflated under backpressure; each
/// yielded snapshot is the newest at poll time.
pub struct StateWatchStream {
    inner: WatchStream<Arc<AppState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<AppState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream over Arc<AppState> is Unpin.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
