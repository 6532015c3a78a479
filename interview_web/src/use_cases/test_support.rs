use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{Browser, SessionStore, TOKEN_KEY, Toast, ToastSink, USERNAME_KEY};

#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl RecordingStore {
    pub(crate) fn with_session(token: &str, username: &str) -> Self {
        let store = Self::default();
        store.set(TOKEN_KEY, token);
        store.set(USERNAME_KEY, username);
        store
    }
}

impl SessionStore for RecordingStore {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> bool {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.remove(key).is_some()
    }
}

#[derive(Default)]
struct BrowserState {
    path: String,
    navigations: Vec<String>,
    titles: Vec<String>,
}

// Fake shell that records forced navigations and title changes.
#[derive(Clone, Default)]
pub(crate) struct RecordingBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl RecordingBrowser {
    pub(crate) fn at(path: &str) -> Self {
        let browser = Self::default();
        browser.state.lock().expect("browser mutex poisoned").path = path.to_string();
        browser
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("browser mutex poisoned")
            .navigations
            .clone()
    }

    pub(crate) fn titles(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("browser mutex poisoned")
            .titles
            .clone()
    }
}

impl Browser for RecordingBrowser {
    fn current_path(&self) -> String {
        self.state.lock().expect("browser mutex poisoned").path.clone()
    }

    fn navigate(&self, full_path: &str) {
        let mut guard = self.state.lock().expect("browser mutex poisoned");
        guard.path = full_path
            .split_once('?')
            .map_or(full_path, |(path, _)| path)
            .to_string();
        guard.navigations.push(full_path.to_string());
    }

    fn set_title(&self, title: &str) {
        let mut guard = self.state.lock().expect("browser mutex poisoned");
        guard.titles.push(title.to_string());
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingToasts {
    shown: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingToasts {
    pub(crate) fn shown(&self) -> Vec<Toast> {
        self.shown.lock().expect("toasts mutex poisoned").clone()
    }
}

impl ToastSink for RecordingToasts {
    fn show(&self, toast: Toast) {
        self.shown.lock().expect("toasts mutex poisoned").push(toast);
    }
}
