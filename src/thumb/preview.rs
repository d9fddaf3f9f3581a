use std::collections::{HashMap, HashSet};

use log::debug;

use super::presenter::preview_uri;
use crate::upload::{ItemKey, PendingItem};

/// Tracks which local previews are on screen so their decoded images can be
/// dropped once no row needs them.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashMap<ItemKey, String>,
}

impl PreviewRegistry {
    pub fn is_live(&self, uri: &str) -> bool {
        self.live.values().any(|u| u == uri)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Re-reads the snapshot. Rows that have a file acquire a preview; rows
    /// that finished or vanished give theirs up. Returns the URIs nobody
    /// uses any more.
    pub fn sync(&mut self, items: &[(ItemKey, PendingItem)]) -> Vec<String> {
        let mut next = HashMap::with_capacity(items.len());
        for (key, item) in items {
            if let Some(file) = item.file() {
                next.insert(*key, preview_uri(file));
            }
        }

        let still_used: HashSet<&String> = next.values().collect();
        let mut released: Vec<String> = self
            .live
            .values()
            .filter(|uri| !still_used.contains(uri))
            .cloned()
            .collect();
        released.sort();
        released.dedup();

        for uri in &released {
            debug!("Releasing preview {}", uri);
        }
        self.live = next;
        released
    }
}
