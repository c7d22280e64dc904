use lapse_core::settings::{FontSettings, SettingsStore};
use log::{info, warn};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Debounced write-back of font settings.
pub(super) struct SettingsSyncState {
    /// `None` until a record is known to be on flash.
    last_saved: Option<FontSettings>,
    pending: Option<(FontSettings, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(stored: Option<FontSettings>) -> Self {
        Self {
            last_saved: stored,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: &FontSettings, now_ms: u64) {
        if self.last_saved.as_ref() == Some(current) {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if pending != current {
                    *pending = current.clone();
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current.clone(), now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Debug,
    {
        let Some((candidate, changed_at_ms)) = self.pending.take() else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            self.pending = Some((candidate, changed_at_ms));
            return;
        }

        match store {
            Some(store) => match store.save(&candidate) {
                Ok(()) => {
                    info!("settings: saved (font={})", candidate.font_path);
                    self.last_saved = Some(candidate);
                }
                Err(err) => {
                    // Flash may be busy; keep the change and retry after another quiet period.
                    warn!("settings: save failed: {err:?}");
                    self.pending = Some((candidate, now_ms));
                }
            },
            None => {
                self.last_saved = Some(candidate);
            }
        }
    }
}
