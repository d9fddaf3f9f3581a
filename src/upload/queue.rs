use super::types::{ItemKey, LocalFile, PendingItem, UploadEvent, UploadEventKind};
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no queued item {0}")]
    UnknownItem(ItemKey),
    #[error("item {key} is already {state}; it cannot change again")]
    Terminal { key: ItemKey, state: &'static str },
    #[error("item {key} cannot go back from {from} to {to}")]
    Backwards {
        key: ItemKey,
        from: &'static str,
        to: &'static str,
    },
}

/// Ordered upload queue. Order and membership are decided here and nowhere else.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: Vec<(ItemKey, PendingItem)>,
    next_key: u64,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, file: LocalFile) -> ItemKey {
        let key = ItemKey(self.next_key);
        self.next_key += 1;
        debug!("Queued {} as {}", file.path.display(), key);
        self.items.push((key, PendingItem::Queued { file }));
        key
    }

    pub fn items(&self) -> &[(ItemKey, PendingItem)] {
        &self.items
    }

    pub fn get(&self, key: ItemKey) -> Option<&PendingItem> {
        self.items.iter().find(|(k, _)| *k == key).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that have not been handed to an uploader yet.
    pub fn queued(&self) -> Vec<(ItemKey, LocalFile)> {
        self.items
            .iter()
            .filter_map(|(key, item)| match item {
                PendingItem::Queued { file } => Some((*key, file.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn remove(&mut self, key: ItemKey) -> Option<PendingItem> {
        let index = self.items.iter().position(|(k, _)| *k == key)?;
        Some(self.items.remove(index).1)
    }

    /// Drops every finished item, keeping order of the rest.
    pub fn clear_finished(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|(_, item)| !item.is_terminal());
        before - self.items.len()
    }

    /// Applies one report. Transitions only move forward; a rejected event
    /// leaves the queue untouched.
    pub fn apply(&mut self, event: UploadEvent) -> Result<(), TransitionError> {
        let key = event.key;
        let slot = self
            .items
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, item)| item)
            .ok_or(TransitionError::UnknownItem(key))?;

        if slot.is_terminal() {
            return Err(TransitionError::Terminal {
                key,
                state: slot.state_name(),
            });
        }

        let next = match event.kind {
            UploadEventKind::Started => {
                let file = current_file(slot);
                PendingItem::Starting { file }
            }
            UploadEventKind::Progress(progress) => {
                let file = current_file(slot);
                PendingItem::Uploading { file, progress }
            }
            UploadEventKind::Completed(base) => PendingItem::Done { base },
            UploadEventKind::Failed(error) => {
                let file = current_file(slot);
                PendingItem::Error { file, error }
            }
        };

        // Uploading -> Uploading is a progress update, every other move must
        // strictly advance.
        let repeat_progress = matches!(
            (&*slot, &next),
            (PendingItem::Uploading { .. }, PendingItem::Uploading { .. })
        );
        if next.rank() <= slot.rank() && !repeat_progress {
            return Err(TransitionError::Backwards {
                key,
                from: slot.state_name(),
                to: next.state_name(),
            });
        }

        if next.is_terminal() {
            info!("Upload {} finished as {}", key, next.state_name());
        }
        *slot = next;
        Ok(())
    }
}

fn current_file(item: &PendingItem) -> LocalFile {
    // Callers have already rejected terminal items, and only Done lacks a file.
    item.file()
        .cloned()
        .unwrap_or_else(|| LocalFile::new(""))
}
