use pane_core::{Interval, Layout, Pane, RemoteConfig, Theme};

use crate::config::resolve_state;
use crate::storage::{keys, KeyValueStore, Persistence};

/// Process-wide dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub panes: Vec<Pane>,
    pub layout: Layout,
    pub theme: Theme,
    /// Id of the pane toolbar actions target; not an owning reference.
    pub active_pane_id: Option<String>,
    /// Read from config and storage; no operation changes it.
    pub default_interval: Interval,
    /// Intervals offered on the topbar.
    pub supported_intervals: Vec<Interval>,
    pub layouts: Vec<Layout>,
}

impl AppState {
    pub fn pane(&self, id: &str) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == id)
    }

    fn pane_mut(&mut self, id: &str) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == id)
    }

    pub fn active_pane(&self) -> Option<&Pane> {
        self.active_pane_id.as_deref().and_then(|id| self.pane(id))
    }

    /// Raw value and label for each topbar interval button.
    pub fn interval_buttons(&self) -> Vec<(&str, String)> {
        self.supported_intervals
            .iter()
            .map(|iv| (iv.as_str(), iv.label()))
            .collect()
    }
}

/// State plus write-through persistence of layout, theme and panes.
pub struct StateStore<S> {
    state: AppState,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(state: AppState, persistence: Persistence<S>) -> Self {
        Self { state, persistence }
    }

    /// Remote defaults overridden by whatever the storage holds.
    pub fn from_remote(remote: &RemoteConfig, persistence: Persistence<S>) -> Self {
        let state = resolve_state(remote, &persistence);
        Self::new(state, persistence)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn into_persistence(self) -> Persistence<S> {
        self.persistence
    }

    pub fn pane(&self, id: &str) -> Option<&Pane> {
        self.state.pane(id)
    }

    pub fn active_pane_id(&self) -> Option<&str> {
        self.state.active_pane_id.as_deref()
    }

    pub fn set_layout(&mut self, layout: Layout) -> bool {
        if self.state.layout == layout {
            return false;
        }
        self.state.layout = layout;
        self.persist(keys::LAYOUT, &layout);
        true
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.state.theme == theme {
            return false;
        }
        self.state.theme = theme;
        self.persist(keys::THEME, &theme);
        true
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.state.theme.toggled();
        self.set_theme(next);
        next
    }

    /// Returns false for an unknown pane or an unchanged interval.
    pub fn set_pane_interval(&mut self, id: &str, interval: Interval) -> bool {
        let Some(pane) = self.state.pane_mut(id) else {
            return false;
        };
        if pane.interval == interval {
            return false;
        }
        pane.interval = interval;
        self.persist_panes();
        true
    }

    /// Stores the symbol uppercased. Returns false for an unknown pane or an unchanged symbol.
    pub fn set_pane_symbol(&mut self, id: &str, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        let Some(pane) = self.state.pane_mut(id) else {
            return false;
        };
        if pane.symbol == symbol {
            return false;
        }
        pane.symbol = symbol;
        self.persist_panes();
        true
    }

    /// Returns false when no pane has this id.
    pub fn set_active_pane(&mut self, id: &str) -> bool {
        if self.state.pane(id).is_none() {
            return false;
        }
        self.state.active_pane_id = Some(id.to_string());
        true
    }

    /// Copy the active pane's interval onto every pane that differs.
    /// Returns the changed ids in collection order; empty when nothing is active.
    pub fn sync_all_intervals_to_active(&mut self) -> Vec<String> {
        let Some(target) = self.state.active_pane().map(|p| p.interval.clone()) else {
            return Vec::new();
        };
        let mut changed = Vec::new();
        for pane in self.state.panes.iter_mut() {
            if pane.interval != target {
                pane.interval = target.clone();
                changed.push(pane.id.clone());
            }
        }
        if !changed.is_empty() {
            self.persist_panes();
        }
        changed
    }

    /// Swap the whole pane collection. The active id is kept only if it survives.
    pub fn replace_panes(&mut self, panes: Vec<Pane>) {
        self.state.panes = panes;
        if self.state.active_pane().is_none() {
            self.state.active_pane_id = None;
        }
        self.persist_panes();
    }

    fn persist_panes(&self) {
        self.persist(keys::CHARTS, &self.state.panes);
    }

    fn persist<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) {
        if let Err(err) = self.persistence.save(name, value) {
            log::warn!("failed to persist {}: {err}", self.persistence.key(name));
        }
    }
}
