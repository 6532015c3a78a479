use crate::domain::Browser;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Location {
    path: String,
    full_path: String,
    history: Vec<String>,
    title: String,
}

// In-process stand-in for the browser window: location, history and document title.
#[derive(Debug)]
pub struct InMemoryBrowser {
    location: Mutex<Location>,
}

impl InMemoryBrowser {
    pub fn new(initial_path: &str) -> Self {
        let browser = Self {
            location: Mutex::new(Location::default()),
        };
        browser.navigate(initial_path);
        browser
    }

    fn lock(&self) -> MutexGuard<'_, Location> {
        self.location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn full_path(&self) -> String {
        self.lock().full_path.clone()
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }
}

impl Browser for InMemoryBrowser {
    fn current_path(&self) -> String {
        self.lock().path.clone()
    }

    fn navigate(&self, full_path: &str) {
        let mut location = self.lock();
        location.path = full_path
            .split_once('?')
            .map_or(full_path, |(path, _)| path)
            .to_string();
        location.full_path = full_path.to_string();
        location.history.push(full_path.to_string());
    }

    fn set_title(&self, title: &str) {
        self.lock().title = title.to_string();
    }
}
