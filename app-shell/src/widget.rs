use pane_core::{Pane, Theme};
use serde::Serialize;

/// Constructor options for the embedded TradingView widget.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetOptions<'a> {
    pub container_id: &'a str,
    pub autosize: bool,
    pub symbol: &'a str,
    pub interval: &'a str,
    pub timezone: &'a str,
    pub theme: Theme,
    pub style: &'a str,
    pub locale: &'a str,
    pub toolbar_bg: &'a str,
    pub hide_top_toolbar: bool,
    pub hide_legend: bool,
    pub allow_symbol_change: bool,
    pub withdateranges: bool,
    pub studies: Vec<String>,
}

impl<'a> WidgetOptions<'a> {
    pub fn new(container_id: &'a str, pane: &'a Pane, theme: Theme, locale: &'a str) -> Self {
        Self {
            container_id,
            autosize: true,
            symbol: &pane.symbol,
            interval: pane.interval.as_str(),
            timezone: "Etc/UTC",
            theme,
            style: "1",
            locale,
            toolbar_bg: "rgba(0,0,0,0)",
            hide_top_toolbar: false,
            hide_legend: false,
            allow_symbol_change: true,
            withdateranges: true,
            studies: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_match_embed_contract() {
        let pane = Pane::new("c1", "BINANCE:BTCUSDT", "240");
        let options = WidgetOptions::new("container_c1", &pane, Theme::Light, "en");
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(
            value,
            json!({
                "container_id": "container_c1",
                "autosize": true,
                "symbol": "BINANCE:BTCUSDT",
                "interval": "240",
                "timezone": "Etc/UTC",
                "theme": "light",
                "style": "1",
                "locale": "en",
                "toolbar_bg": "rgba(0,0,0,0)",
                "hide_top_toolbar": false,
                "hide_legend": false,
                "allow_symbol_change": true,
                "withdateranges": true,
                "studies": []
            })
        );
    }
}
