// ── Theme store ──
//
// Light/dark preference. Persistence here is best-effort: the preference
// is a low-stakes cache, so a failed write is logged and otherwise
// ignored.

use std::sync::Arc;

use tracing::warn;

use super::StateCell;
use crate::model::ThemeMode;
use crate::storage::PersistenceGateway;

pub struct ThemeStore {
    state: Arc<StateCell>,
    gateway: Arc<PersistenceGateway>,
}

impl ThemeStore {
    pub(crate) fn new(state: Arc<StateCell>, gateway: Arc<PersistenceGateway>) -> Self {
        Self { state, gateway }
    }

    /// Flip light/dark and persist the new preference.
    pub async fn toggle(&self) {
        let mode = self.state.apply_with(|state| {
            let mut next = state.clone();
            next.theme = state.theme.toggled();
            let mode = next.theme;
            (next, mode)
        });

        if let Err(err) = self.gateway.save_theme(mode).await {
            warn!(error = %err, "failed to persist theme preference (non-fatal)");
        }
    }

    /// One-shot initializer used during startup; publishes without
    /// writing back.
    pub fn set_from_persisted(&self, mode: ThemeMode) {
        self.state.apply(move |state| {
            let mut next = state.clone();
            next.theme = mode;
            next
        });
    }

    /// Startup helper: restore the stored preference, if any. An absent
    /// or unreadable value leaves the default.
    pub async fn load_persisted(&self) {
        if let Some(mode) = self.gateway.load_theme().await {
            self.set_from_persisted(mode);
        }
    }
}
