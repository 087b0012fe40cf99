//! Browser LocalStorage store

use wasm_bindgen::JsValue;

use super::{KeyValueStore, StorageError, check_key};

pub struct LocalStore {
    storage: web_sys::Storage,
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{err:?}"))
}

impl LocalStore {
    /// The window's LocalStorage, if the browser allows it
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("LocalStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.storage.remove_item(key).map_err(js_error)
    }
}
