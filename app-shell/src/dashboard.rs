use pane_core::{Interval, Layout, Pane};

use crate::error::ShellError;
use crate::grid::{ChartRenderer, GridRenderer, GridSurface};
use crate::storage::KeyValueStore;
use crate::store::StateStore;

/// Application controller: one store mutation then the smallest re-render per UI event.
pub struct Dashboard<S, D, R: ChartRenderer> {
    store: StateStore<S>,
    grid: GridRenderer<D, R>,
}

impl<S, D, R> Dashboard<S, D, R>
where
    S: KeyValueStore,
    D: GridSurface,
    R: ChartRenderer,
{
    pub fn new(store: StateStore<S>, grid: GridRenderer<D, R>) -> Self {
        Self { store, grid }
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    pub fn grid(&self) -> &GridRenderer<D, R> {
        &self.grid
    }

    /// Initial paint: root theme, grid layout, then every card.
    pub fn start(&mut self) -> Result<(), ShellError> {
        let state = self.store.state();
        self.grid.apply_theme(state.theme)?;
        self.grid.apply_layout(state.layout)?;
        self.render_all()
    }

    /// Topbar interval button: targets the active pane.
    pub fn on_topbar_interval(&mut self, interval: &str) -> Result<(), ShellError> {
        let Some(id) = self.store.active_pane_id().map(str::to_string) else {
            return Ok(());
        };
        self.change_interval(&id, Interval::from(interval))
    }

    /// Quick-interval chip inside a card. Does not activate the card.
    pub fn on_card_chip(&mut self, pane_id: &str, interval: &str) -> Result<(), ShellError> {
        self.change_interval(pane_id, Interval::from(interval))
    }

    pub fn on_apply_symbol(&mut self, input: &str) -> Result<(), ShellError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Ok(());
        }
        let Some(id) = self.store.active_pane_id().map(str::to_string) else {
            return Ok(());
        };
        if self.store.set_pane_symbol(&id, &symbol) {
            self.refresh_pane(&id)?;
        }
        Ok(())
    }

    /// Layout selector: grid class and label only, widgets stay.
    pub fn on_layout_change(&mut self, value: &str) -> Result<(), ShellError> {
        let layout = match value.parse::<Layout>() {
            Ok(layout) => layout,
            Err(err) => {
                log::debug!("ignoring layout selection: {err}");
                return Ok(());
            }
        };
        self.store.set_layout(layout);
        self.grid.apply_layout(layout)
    }

    pub fn on_sync_intervals(&mut self) -> Result<(), ShellError> {
        for id in self.store.sync_all_intervals_to_active() {
            self.refresh_pane(&id)?;
        }
        Ok(())
    }

    /// Theme is a construction parameter of every widget, so the whole grid is rebuilt.
    pub fn on_theme_toggle(&mut self) -> Result<(), ShellError> {
        let theme = self.store.toggle_theme();
        self.grid.apply_theme(theme)?;
        self.render_all()
    }

    /// New pane collection: every card and widget is recreated.
    pub fn replace_panes(&mut self, panes: Vec<Pane>) -> Result<(), ShellError> {
        self.store.replace_panes(panes);
        self.render_all()
    }

    pub fn on_card_click(&mut self, pane_id: &str) -> Result<(), ShellError> {
        if self.store.set_active_pane(pane_id) {
            self.grid.set_active_card(pane_id)?;
        }
        Ok(())
    }

    fn change_interval(&mut self, pane_id: &str, interval: Interval) -> Result<(), ShellError> {
        if !interval.is_supported() {
            log::debug!("interval {interval} is not in the supported list, passing it through");
        }
        if self.store.set_pane_interval(pane_id, interval) {
            self.refresh_pane(pane_id)?;
        }
        Ok(())
    }

    fn refresh_pane(&mut self, pane_id: &str) -> Result<(), ShellError> {
        let theme = self.store.state().theme;
        let Some(pane) = self.store.pane(pane_id).cloned() else {
            return Ok(());
        };
        self.grid.update_card_header(&pane)?;
        self.grid.rebuild_pane(&pane, theme);
        Ok(())
    }

    fn render_all(&mut self) -> Result<(), ShellError> {
        let state = self.store.state();
        self.grid.rebuild_all(&state.panes, state.theme)?;

        // Fresh cards carry no marker; keep the active pane or fall back to the first.
        let target = self
            .store
            .state()
            .active_pane()
            .or_else(|| self.store.state().panes.first())
            .map(|p| p.id.clone());
        if let Some(id) = target {
            self.on_card_click(&id)?;
        }
        Ok(())
    }
}
