use pane_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("dom error: {0}")]
    Surface(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("widget error: {0}")]
    Widget(String),
}

#[cfg(target_arch = "wasm32")]
impl ShellError {
    pub(crate) fn from_js(err: wasm_bindgen::JsValue) -> Self {
        ShellError::Surface(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ShellError> for wasm_bindgen::JsValue {
    fn from(err: ShellError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
