//! Recording fakes for the grid seams.

use pane_core::{CardView, Layout, Pane, Theme};

use crate::error::ShellError;
use crate::grid::{ChartRenderer, GridSurface};

#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// (pane id, header title) in DOM order.
    pub cards: Vec<(String, String)>,
    pub active: Option<String>,
    pub layout: Option<Layout>,
    pub theme: Option<Theme>,
    pub clears: usize,
    /// Pane ids of cards hidden by the layout.
    pub hidden: Vec<String>,
}

impl RecordingSurface {
    pub fn titles(&self) -> Vec<&str> {
        self.cards.iter().map(|(_, title)| title.as_str()).collect()
    }

    pub fn title_of(&self, pane_id: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|(id, _)| id == pane_id)
            .map(|(_, title)| title.as_str())
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.cards
            .iter()
            .map(|(id, _)| id.as_str())
            .filter(|id| !self.hidden.iter().any(|h| h == id))
            .collect()
    }
}

impl GridSurface for RecordingSurface {
    fn clear_cards(&mut self) -> Result<(), ShellError> {
        self.cards.clear();
        self.hidden.clear();
        self.clears += 1;
        Ok(())
    }

    fn append_card(&mut self, card: &CardView) -> Result<(), ShellError> {
        self.cards.push((card.pane_id.clone(), card.title()));
        Ok(())
    }

    fn update_header(&mut self, card: &CardView) -> Result<bool, ShellError> {
        match self.cards.iter_mut().find(|(id, _)| *id == card.pane_id) {
            Some(entry) => {
                entry.1 = card.title();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn mark_active(&mut self, pane_id: &str) -> Result<(), ShellError> {
        self.active = Some(pane_id.to_string());
        Ok(())
    }

    fn apply_layout(&mut self, layout: Layout) -> Result<(), ShellError> {
        self.layout = Some(layout);
        Ok(())
    }

    fn limit_visible(&mut self, capacity: usize) -> Result<(), ShellError> {
        self.hidden = self.cards.iter().skip(capacity).map(|(id, _)| id.clone()).collect();
        Ok(())
    }

    fn apply_theme(&mut self, theme: Theme) -> Result<(), ShellError> {
        self.theme = Some(theme);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedWidget {
    pub handle: u32,
    pub container_id: String,
    pub symbol: String,
    pub interval: String,
    pub theme: Theme,
}

#[derive(Debug, Default)]
pub struct FakeRenderer {
    next_handle: u32,
    pub spawned: Vec<SpawnedWidget>,
    pub released: Vec<u32>,
    fail_render: bool,
    fail_release: bool,
}

impl FakeRenderer {
    pub fn failing_release() -> Self {
        Self {
            fail_release: true,
            ..Self::default()
        }
    }

    pub fn failing_render() -> Self {
        Self {
            fail_render: true,
            ..Self::default()
        }
    }

    /// Widgets spawned and not yet released.
    pub fn live(&self) -> usize {
        self.spawned.len() - self.released.len()
    }
}

impl ChartRenderer for FakeRenderer {
    type Handle = u32;
    type Error = String;

    fn render_pane(&mut self, container_id: &str, pane: &Pane, theme: Theme) -> Result<u32, String> {
        if self.fail_render {
            return Err("TradingView is not defined".to_string());
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.spawned.push(SpawnedWidget {
            handle,
            container_id: container_id.to_string(),
            symbol: pane.symbol.clone(),
            interval: pane.interval.to_string(),
            theme,
        });
        Ok(handle)
    }

    fn release(&mut self, handle: u32) -> Result<(), String> {
        self.released.push(handle);
        if self.fail_release {
            return Err("widget already torn down".to_string());
        }
        Ok(())
    }
}
