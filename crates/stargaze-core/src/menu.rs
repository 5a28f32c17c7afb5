//! Context menu sinks.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::ContextMenu;

/// Menu id of the rate-limit summary entry.
pub const MENU_RATE_LIMIT: &str = "rate-limit";

/// Discards every title.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMenu;

impl ContextMenu for NoopMenu {
    fn upsert(&self, _menu_id: &str, _title: &str) {}
}

/// Keeps the latest title per menu id.
#[derive(Debug, Default)]
pub struct MenuTitles {
    titles: Mutex<HashMap<String, String>>,
}

impl MenuTitles {
    /// Create an empty title store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest title published for `menu_id`.
    #[must_use]
    pub fn title(&self, menu_id: &str) -> Option<String> {
        self.titles
            .lock()
            .ok()
            .and_then(|titles| titles.get(menu_id).cloned())
    }
}

impl ContextMenu for MenuTitles {
    fn upsert(&self, menu_id: &str, title: &str) {
        if let Ok(mut titles) = self.titles.lock() {
            titles.insert(menu_id.to_string(), title.to_string());
        }
    }
}
