use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Namespace prepended to every persisted key.
pub const DEFAULT_PREFIX: &str = "mc_";

/// Key names under the namespace.
pub mod keys {
    pub const CHARTS: &str = "charts";
    pub const DEFAULT_INTERVAL: &str = "defaultInterval";
    pub const LAYOUT: &str = "layout";
    pub const THEME: &str = "theme";
}

/// String key-value storage (browser localStorage or an in-memory map).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store; used on the host target and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            items: RefCell::new(items),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed JSON values under a fixed key prefix.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Missing, unreadable and unparseable entries all read as `None`.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let key = self.key(name);
        let raw = match self.store.get_item(&key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::debug!("reading {key} failed: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("ignoring unparseable {key}: {err}");
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.set_item(&self.key(name), &json)
    }
}

// ---------- Browser localStorage --------------------------------------------

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStore;
    use crate::error::StorageError;
    use web_sys::Storage;

    fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    /// `window.localStorage`; behaves as an empty, read-only store when the
    /// browser refuses access (e.g. storage disabled).
    pub struct LocalStorage {
        storage: Option<Storage>,
    }

    impl LocalStorage {
        pub fn open() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            if storage.is_none() {
                log::warn!("localStorage unavailable; preferences will not persist");
            }
            Self { storage }
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            match &self.storage {
                Some(storage) => storage.get_item(key).map_err(js_error),
                None => Ok(None),
            }
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(js_error)
        }
    }
}
