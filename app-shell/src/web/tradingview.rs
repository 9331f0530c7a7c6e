use pane_core::{Pane, Theme};
use wasm_bindgen::prelude::*;

use crate::error::ShellError;
use crate::grid::ChartRenderer;
use crate::widget::WidgetOptions;

#[wasm_bindgen(js_namespace = TradingView)]
extern "C" {
    /// `TradingView.widget` from the tv.js embed script.
    #[wasm_bindgen(js_name = widget)]
    pub type TvWidget;

    #[wasm_bindgen(constructor, js_class = "widget", catch)]
    fn new(options: &JsValue) -> Result<TvWidget, JsValue>;

    #[wasm_bindgen(method, js_class = "widget", catch)]
    fn remove(this: &TvWidget) -> Result<(), JsValue>;
}

/// Spawns one TradingView widget per pane.
pub struct TradingViewRenderer {
    locale: String,
}

impl TradingViewRenderer {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Default for TradingViewRenderer {
    fn default() -> Self {
        Self::new("en")
    }
}

impl ChartRenderer for TradingViewRenderer {
    type Handle = TvWidget;
    type Error = ShellError;

    fn render_pane(
        &mut self,
        container_id: &str,
        pane: &Pane,
        theme: Theme,
    ) -> Result<TvWidget, ShellError> {
        let options = WidgetOptions::new(container_id, pane, theme, &self.locale);
        let json = serde_json::to_string(&options).map_err(|e| ShellError::Widget(e.to_string()))?;
        let value = js_sys::JSON::parse(&json).map_err(ShellError::from_js)?;
        TvWidget::new(&value).map_err(ShellError::from_js)
    }

    fn release(&mut self, handle: TvWidget) -> Result<(), ShellError> {
        // Older embeds have no `remove`; the call then throws and lands here.
        handle.remove().map_err(ShellError::from_js)
    }
}
