use std::collections::HashSet;

use pane_core::{Interval, Layout, Pane, RemoteConfig, Theme};

use crate::storage::{keys, KeyValueStore, Persistence};
use crate::store::AppState;

/// Where the remote defaults are fetched from unless the host says otherwise.
pub const DEFAULT_CONFIG_URL: &str = "/config";

/// Runtime options for the browser entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    pub config_url: String,
    pub storage_prefix: String,
    /// Level for this crate's records; other crates stay at `Warn` or quieter.
    pub log_level: log::LevelFilter,
}

impl ShellOptions {
    /// Apply a level name such as `"debug"`. Unknown names keep the current level.
    pub fn with_log_level(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(level) => self.log_level = level,
            Err(_) => log::warn!("unknown log level {name:?}, keeping {}", self.log_level),
        }
        self
    }
}

impl Default for ShellOptions {
    fn default() -> Self {
        let log_level = if cfg!(debug_assertions) {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Error
        };
        Self {
            config_url: DEFAULT_CONFIG_URL.to_string(),
            storage_prefix: crate::storage::DEFAULT_PREFIX.to_string(),
            log_level,
        }
    }
}

/// Merge remote defaults with persisted overrides, field by field.
pub fn resolve_state<S: KeyValueStore>(remote: &RemoteConfig, persistence: &Persistence<S>) -> AppState {
    let panes = persistence
        .load::<Vec<Pane>>(keys::CHARTS)
        .filter(|panes| has_unique_ids(panes))
        .unwrap_or_else(|| remote.charts.clone());
    let default_interval = persistence
        .load::<Interval>(keys::DEFAULT_INTERVAL)
        .unwrap_or_else(|| remote.default_interval.clone());
    let layout = persistence.load::<Layout>(keys::LAYOUT).unwrap_or_default();
    let theme = persistence
        .load::<Theme>(keys::THEME)
        .unwrap_or_else(|| remote.theme());

    log::info!(
        "resolved {} panes, layout {layout}, theme {theme}",
        panes.len()
    );

    AppState {
        panes,
        layout,
        theme,
        active_pane_id: None,
        default_interval,
        supported_intervals: remote.supported_intervals(),
        layouts: remote.layouts(),
    }
}

fn has_unique_ids(panes: &[Pane]) -> bool {
    let mut seen = HashSet::new();
    let unique = panes.iter().all(|p| seen.insert(p.id.as_str()));
    if !unique {
        log::debug!("persisted panes contain duplicate ids; using remote defaults");
    }
    unique
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_remote_config(url: &str) -> Result<RemoteConfig, crate::ShellError> {
    use crate::ShellError;
    use gloo_net::http::Request;

    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ShellError::Config(e.to_string()))?;
    if !resp.ok() {
        return Err(ShellError::Config(format!(
            "{url} returned status {}",
            resp.status()
        )));
    }
    resp.json::<RemoteConfig>()
        .await
        .map_err(|e| ShellError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn remote() -> RemoteConfig {
        serde_json::from_str(
            r#"{
                "charts": [{"id": "a", "symbol": "BTCUSD", "interval": "60"}],
                "defaultInterval": "60",
                "supportedIntervals": ["1", "3", "5", "15", "30", "60", "120", "240", "1D"],
                "theme": "dark"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn empty_storage_uses_remote_defaults() {
        let state = resolve_state(&remote(), &Persistence::new(MemoryStore::new()));
        assert_eq!(state.panes, vec![Pane::new("a", "BTCUSD", "60")]);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.layout.to_string(), "2x2");
        assert_eq!(state.default_interval.as_str(), "60");
        assert_eq!(state.active_pane_id, None);
        assert_eq!(state.supported_intervals.len(), 9);
    }

    #[test]
    fn persisted_values_override_remote() {
        let store = MemoryStore::with_items([
            ("mc_charts", r#"[{"id":"x","symbol":"ETHUSD","interval":"1D"}]"#),
            ("mc_defaultInterval", "\"15\""),
            ("mc_layout", "\"1x1\""),
            ("mc_theme", "\"light\""),
        ]);
        let state = resolve_state(&remote(), &Persistence::new(store));
        assert_eq!(state.panes[0].id, "x");
        assert_eq!(state.default_interval.as_str(), "15");
        assert_eq!(state.layout.to_string(), "1x1");
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn corrupt_keys_fall_back_individually() {
        let store = MemoryStore::with_items([
            ("mc_charts", "[{\"id\":"),
            ("mc_layout", "\"banana\""),
            ("mc_theme", "\"light\""),
        ]);
        let state = resolve_state(&remote(), &Persistence::new(store));
        assert_eq!(state.panes[0].symbol, "BTCUSD");
        assert_eq!(state.layout, Layout::default());
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn duplicate_persisted_ids_are_rejected() {
        let store = MemoryStore::with_items([(
            "mc_charts",
            r#"[{"id":"x","symbol":"A","interval":"1"},{"id":"x","symbol":"B","interval":"5"}]"#,
        )]);
        let state = resolve_state(&remote(), &Persistence::new(store));
        assert_eq!(state.panes[0].id, "a");
    }

    #[test]
    fn default_options() {
        let options = ShellOptions::default();
        assert_eq!(options.config_url, "/config");
        assert_eq!(options.storage_prefix, "mc_");
    }

    #[test]
    fn log_level_by_name() {
        let options = ShellOptions::default().with_log_level("debug");
        assert_eq!(options.log_level, log::LevelFilter::Debug);
        let options = options.with_log_level("chatty");
        assert_eq!(options.log_level, log::LevelFilter::Debug);
        assert_eq!(ShellOptions::default().with_log_level("OFF").log_level, log::LevelFilter::Off);
    }
}
