use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Intervals the dashboard offers out of the box. The external renderer accepts more.
pub const SUPPORTED_INTERVALS: [&str; 9] = ["1", "3", "5", "15", "30", "60", "120", "240", "1D"];

/// Intervals shown as quick chips in every card header.
pub const QUICK_INTERVALS: [&str; 6] = ["1", "5", "15", "60", "240", "1D"];

/// Layouts offered when the remote config does not list any.
pub const DEFAULT_LAYOUTS: [&str; 6] = ["1x1", "2x1", "2x2", "3x1", "3x2", "3x3"];

const MAX_GRID_DIM: u8 = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("invalid theme: {0}")]
    InvalidTheme(String),
}

/// Chart interval in the external renderer's vocabulary ("1", "60", "1D", ...).
///
/// Values outside [`SUPPORTED_INTERVALS`] are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interval(String);

impl Interval {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_INTERVALS.contains(&self.0.as_str())
    }

    /// Human-readable label, e.g. "60" -> "1h". Unknown values render as minutes.
    pub fn label(&self) -> String {
        let known = match self.0.as_str() {
            "1D" => "1D",
            "1" => "1m",
            "3" => "3m",
            "5" => "5m",
            "15" => "15m",
            "30" => "30m",
            "60" => "1h",
            "120" => "2h",
            "240" => "4h",
            other => return format!("{other}m"),
        };
        known.to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Interval {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Class applied to the document body.
    pub fn css_class(&self) -> String {
        format!("theme-{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ModelError::InvalidTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid arrangement written as "<cols>x<rows>".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layout {
    cols: u8,
    rows: u8,
}

impl Layout {
    pub fn new(cols: u8, rows: u8) -> Result<Self, ModelError> {
        if !(1..=MAX_GRID_DIM).contains(&cols) || !(1..=MAX_GRID_DIM).contains(&rows) {
            return Err(ModelError::InvalidLayout(format!("{cols}x{rows}")));
        }
        Ok(Self { cols, rows })
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of panes visible at once.
    pub fn capacity(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn css_class(&self) -> String {
        format!("layout-{self}")
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self { cols: 2, rows: 2 }
    }
}

impl FromStr for Layout {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidLayout(s.to_string());
        let (cols, rows) = s.split_once('x').ok_or_else(invalid)?;
        let cols = cols.parse::<u8>().map_err(|_| invalid())?;
        let rows = rows.parse::<u8>().map_err(|_| invalid())?;
        Layout::new(cols, rows)
    }
}

impl TryFrom<String> for Layout {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        layout.to_string()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// One chart card: symbol and interval keyed by a session-unique id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    pub id: String,
    pub symbol: String,
    pub interval: Interval,
}

impl Pane {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, interval: impl Into<Interval>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            interval: interval.into(),
        }
    }

    /// DOM id of the body element the widget renders into.
    pub fn container_id(&self) -> String {
        container_id(&self.id)
    }
}

pub fn container_id(pane_id: &str) -> String {
    format!("container_{pane_id}")
}

/// Everything a card header needs, derived from a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub pane_id: String,
    pub symbol: String,
    pub interval_label: String,
    pub container_id: String,
}

impl CardView {
    pub fn title(&self) -> String {
        format!("{} • {}", self.symbol, self.interval_label)
    }
}

impl From<&Pane> for CardView {
    fn from(pane: &Pane) -> Self {
        Self {
            pane_id: pane.id.clone(),
            symbol: pane.symbol.clone(),
            interval_label: pane.interval.label(),
            container_id: pane.container_id(),
        }
    }
}

/// Defaults served by the configuration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub charts: Vec<Pane>,
    pub default_interval: Interval,
    #[serde(default)]
    pub supported_intervals: Vec<Interval>,
    #[serde(default)]
    pub layouts: Vec<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl RemoteConfig {
    /// Served theme; anything but "light" is dark.
    pub fn theme(&self) -> Theme {
        match self.theme.as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Valid layouts from the config, or the built-in list when none parse.
    pub fn layouts(&self) -> Vec<Layout> {
        let parsed: Vec<Layout> = self
            .layouts
            .iter()
            .filter_map(|l| l.parse().ok())
            .collect();
        if parsed.is_empty() {
            DEFAULT_LAYOUTS.iter().filter_map(|l| l.parse().ok()).collect()
        } else {
            parsed
        }
    }

    pub fn supported_intervals(&self) -> Vec<Interval> {
        if self.supported_intervals.is_empty() {
            SUPPORTED_INTERVALS.iter().map(|iv| Interval::from(*iv)).collect()
        } else {
            self.supported_intervals.clone()
        }
    }
}
