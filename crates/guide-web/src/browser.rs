//! Browser Capabilities
//!
//! `localStorage` and `window.confirm` behind the core's `Storage` and
//! `Confirm` traits.

use guide_core::{Confirm, GuideError, Result, Storage};
use wasm_bindgen::JsValue;

/// `window.localStorage`
///
/// Missing storage (private mode, sandboxed iframes) degrades to errors on
/// every call, which the session logs and ignores.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            tracing::warn!("localStorage unavailable, chat history will not persist");
        }
        Self { inner }
    }

    fn storage(&self) -> Result<&web_sys::Storage> {
        self.inner
            .as_ref()
            .ok_or_else(|| GuideError::Storage("localStorage unavailable".into()))
    }
}

fn js_error(err: JsValue) -> GuideError {
    GuideError::Storage(format!("{err:?}"))
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

/// `window.confirm`; answers "no" when there is no window
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}
