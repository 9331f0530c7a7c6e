//! Multi-chart dashboard shell: persisted pane state, grid rebuild policy and,
//! on `wasm32`, the DOM and TradingView bindings.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod grid;
pub mod storage;
pub mod store;
pub mod widget;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{resolve_state, ShellOptions, DEFAULT_CONFIG_URL};
pub use dashboard::Dashboard;
pub use error::{ShellError, StorageError};
pub use grid::{ChartRenderer, GridRenderer, GridSurface};
pub use storage::{KeyValueStore, MemoryStore, Persistence, DEFAULT_PREFIX};
pub use store::{AppState, StateStore};
pub use widget::WidgetOptions;

pub use pane_core::{CardView, Interval, Layout, Pane, RemoteConfig, Theme};
