//! Browser entry point: fetch config, build the dashboard, bind the page.

mod bindings;
mod dom;
mod tradingview;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub use bindings::{SharedDashboard, WebDashboard};
pub use dom::DomSurface;
pub use tradingview::{TradingViewRenderer, TvWidget};

use crate::config::{fetch_remote_config, ShellOptions};
use crate::dashboard::Dashboard;
use crate::error::ShellError;
use crate::grid::GridRenderer;
use crate::storage::{LocalStorage, Persistence};
use crate::store::StateStore;

/// Route `log` records to the browser console. Dependencies log at `Warn` at most.
fn init_log(level: log::LevelFilter) {
    let result = fern::Dispatch::new()
        .level(level.min(log::LevelFilter::Warn))
        .level_for(env!("CARGO_CRATE_NAME"), level)
        .chain(fern::Output::call(|record| {
            let line = wasm_bindgen::JsValue::from(format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&line),
                log::Level::Warn => web_sys::console::warn_1(&line),
                log::Level::Info => web_sys::console::info_1(&line),
                log::Level::Debug | log::Level::Trace => web_sys::console::log_1(&line),
            }
        }))
        .apply();
    if result.is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }
}

/// Start the dashboard. `config_url` defaults to `/config`; `log_level` takes
/// names like `"debug"` and defaults to `info` in debug builds.
#[wasm_bindgen]
pub fn start(config_url: Option<String>, log_level: Option<String>) {
    console_error_panic_hook::set_once();

    let mut options = ShellOptions::default();
    if let Some(name) = log_level {
        options = options.with_log_level(&name);
    }
    init_log(options.log_level);
    if let Some(url) = config_url {
        options.config_url = url;
    }
    spawn_local(async move {
        // No retry: a failed fetch leaves the page unpainted.
        if let Err(err) = boot(options).await {
            log::error!("dashboard failed to start: {err}");
        }
    });
}

async fn boot(options: ShellOptions) -> Result<(), ShellError> {
    let remote = fetch_remote_config(&options.config_url).await?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ShellError::Surface("no document".to_string()))?;

    let persistence = Persistence::with_prefix(LocalStorage::open(), options.storage_prefix);
    let store = StateStore::from_remote(&remote, persistence);

    let surface = DomSurface::new(&document)?;
    surface.offer_layouts(&store.state().layouts)?;
    surface.offer_intervals(&store.state().interval_buttons())?;
    let grid = GridRenderer::new(surface, TradingViewRenderer::default());

    let mut dashboard = Dashboard::new(store, grid);
    dashboard.start()?;

    let dashboard: SharedDashboard = Rc::new(RefCell::new(dashboard));
    bindings::bind_controls(&document, &dashboard)?;
    log::info!("dashboard ready");
    Ok(())
}
