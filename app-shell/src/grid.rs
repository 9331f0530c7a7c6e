use std::collections::HashMap;
use std::fmt;

use pane_core::{CardView, Layout, Pane, Theme};

use crate::error::ShellError;

/// External chart widget factory. Widgets cannot change symbol or interval
/// after construction, so every such change is a release followed by a render.
pub trait ChartRenderer {
    type Handle;
    type Error: fmt::Display;

    fn render_pane(
        &mut self,
        container_id: &str,
        pane: &Pane,
        theme: Theme,
    ) -> Result<Self::Handle, Self::Error>;

    /// Best-effort teardown; callers ignore failures.
    fn release(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// DOM operations the grid needs. Card bodies must exist once `append_card` returns.
pub trait GridSurface {
    fn clear_cards(&mut self) -> Result<(), ShellError>;
    fn append_card(&mut self, card: &CardView) -> Result<(), ShellError>;
    /// Returns false when no card exists for the pane.
    fn update_header(&mut self, card: &CardView) -> Result<bool, ShellError>;
    fn mark_active(&mut self, pane_id: &str) -> Result<(), ShellError>;
    fn apply_layout(&mut self, layout: Layout) -> Result<(), ShellError>;
    /// Show the first `capacity` cards in DOM order and hide the rest.
    fn limit_visible(&mut self, capacity: usize) -> Result<(), ShellError>;
    fn apply_theme(&mut self, theme: Theme) -> Result<(), ShellError>;
}

/// Owns one widget handle per rendered pane and decides when to rebuild.
pub struct GridRenderer<D, R: ChartRenderer> {
    surface: D,
    renderer: R,
    handles: HashMap<String, R::Handle>,
    /// Cards the current layout can show; `None` until a layout is applied.
    capacity: Option<usize>,
}

impl<D: GridSurface, R: ChartRenderer> GridRenderer<D, R> {
    pub fn new(surface: D, renderer: R) -> Self {
        Self {
            surface,
            renderer,
            handles: HashMap::new(),
            capacity: None,
        }
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn has_widget(&self, pane_id: &str) -> bool {
        self.handles.contains_key(pane_id)
    }

    pub fn widget_count(&self) -> usize {
        self.handles.len()
    }

    /// Drop every card and widget, then recreate them in pane order.
    pub fn rebuild_all(&mut self, panes: &[Pane], theme: Theme) -> Result<(), ShellError> {
        let stale: Vec<R::Handle> = self.handles.drain().map(|(_, h)| h).collect();
        for handle in stale {
            self.release_handle(handle);
        }
        self.surface.clear_cards()?;
        for pane in panes {
            self.surface.append_card(&CardView::from(pane))?;
            self.spawn(pane, theme);
        }
        if let Some(capacity) = self.capacity {
            self.surface.limit_visible(capacity)?;
        }
        log::debug!("rebuilt grid with {} panes", panes.len());
        Ok(())
    }

    /// Replace one pane's widget; other panes keep theirs.
    pub fn rebuild_pane(&mut self, pane: &Pane, theme: Theme) {
        if let Some(handle) = self.handles.remove(&pane.id) {
            self.release_handle(handle);
        }
        self.spawn(pane, theme);
    }

    pub fn update_card_header(&mut self, pane: &Pane) -> Result<bool, ShellError> {
        self.surface.update_header(&CardView::from(pane))
    }

    pub fn set_active_card(&mut self, pane_id: &str) -> Result<(), ShellError> {
        self.surface.mark_active(pane_id)
    }

    /// Grid template and card visibility. Hidden cards keep their widgets.
    pub fn apply_layout(&mut self, layout: Layout) -> Result<(), ShellError> {
        self.surface.apply_layout(layout)?;
        self.capacity = Some(layout.capacity());
        self.surface.limit_visible(layout.capacity())
    }

    pub fn apply_theme(&mut self, theme: Theme) -> Result<(), ShellError> {
        self.surface.apply_theme(theme)
    }

    fn spawn(&mut self, pane: &Pane, theme: Theme) {
        match self
            .renderer
            .render_pane(&pane.container_id(), pane, theme)
        {
            Ok(handle) => {
                self.handles.insert(pane.id.clone(), handle);
            }
            Err(err) => log::error!("chart for pane {} failed to render: {err}", pane.id),
        }
    }

    fn release_handle(&mut self, handle: R::Handle) {
        if let Err(err) = self.renderer.release(handle) {
            log::debug!("ignoring widget teardown error: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRenderer, RecordingSurface};

    fn panes() -> Vec<Pane> {
        vec![Pane::new("a", "BTCUSD", "60"), Pane::new("b", "ETHUSD", "1D")]
    }

    fn grid() -> GridRenderer<RecordingSurface, FakeRenderer> {
        GridRenderer::new(RecordingSurface::default(), FakeRenderer::default())
    }

    #[test]
    fn full_rebuild_creates_card_and_widget_per_pane() {
        let mut grid = grid();
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        assert_eq!(grid.surface().titles(), vec!["BTCUSD • 1h", "ETHUSD • 1D"]);
        assert_eq!(grid.widget_count(), 2);
        assert_eq!(grid.renderer().live(), 2);
        assert_eq!(grid.renderer().spawned[0].container_id, "container_a");
    }

    #[test]
    fn full_rebuild_releases_previous_widgets() {
        let mut grid = grid();
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        grid.rebuild_all(&panes(), Theme::Light).unwrap();
        assert_eq!(grid.renderer().released.len(), 2);
        assert_eq!(grid.renderer().live(), 2);
        assert_eq!(grid.surface().cards.len(), 2);
        assert!(grid.renderer().spawned[2..].iter().all(|w| w.theme == Theme::Light));
    }

    #[test]
    fn pane_rebuild_touches_only_that_pane() {
        let mut grid = grid();
        let mut panes = panes();
        grid.rebuild_all(&panes, Theme::Dark).unwrap();
        panes[1].interval = "15".into();
        grid.rebuild_pane(&panes[1], Theme::Dark);
        assert_eq!(grid.renderer().released, vec![1]);
        assert_eq!(grid.renderer().spawned.len(), 3);
        assert_eq!(grid.renderer().spawned[2].interval, "15");
        assert!(grid.has_widget("a"));
    }

    #[test]
    fn teardown_failures_are_swallowed() {
        let mut grid = GridRenderer::new(RecordingSurface::default(), FakeRenderer::failing_release());
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        grid.rebuild_pane(&panes()[0], Theme::Dark);
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        assert_eq!(grid.widget_count(), 2);
    }

    #[test]
    fn render_failure_leaves_card_without_widget() {
        let mut grid = GridRenderer::new(RecordingSurface::default(), FakeRenderer::failing_render());
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        assert_eq!(grid.surface().cards.len(), 2);
        assert_eq!(grid.widget_count(), 0);
    }

    #[test]
    fn rebuild_keeps_cards_past_capacity_hidden() {
        let mut grid = grid();
        grid.apply_layout("1x1".parse().unwrap()).unwrap();
        grid.rebuild_all(&panes(), Theme::Dark).unwrap();
        assert_eq!(grid.surface().visible_ids(), vec!["a"]);
        assert_eq!(grid.widget_count(), 2);

        grid.apply_layout("2x1".parse().unwrap()).unwrap();
        assert_eq!(grid.surface().visible_ids(), vec!["a", "b"]);
        assert_eq!(grid.renderer().spawned.len(), 2);
    }

    #[test]
    fn header_update_for_missing_card() {
        let mut grid = grid();
        let pane = Pane::new("ghost", "X", "1");
        assert!(!grid.update_card_header(&pane).unwrap());
    }
}
