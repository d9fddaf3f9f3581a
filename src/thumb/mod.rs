mod copy;
mod preview;
pub mod presenter;

pub use copy::{failure_alert, resolve_link, Clipboard, ClipboardError, CopyState};
pub use presenter::{
    present, present_pending, DoneView, InvariantViolation, ItemView, PendingBody, PendingView,
    PreviewSource,
};
pub use preview::PreviewRegistry;

use crate::upload::{ItemKey, PendingItem};
use log::error;
use std::collections::HashMap;

/// One rendered row. A row that hit an invariant violation still shows up,
/// as a broken placeholder, so the rest of the list is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: ItemKey,
    pub view: Result<ItemView, InvariantViolation>,
}

/// Everything the thumbnail list remembers between frames: the "copied"
/// flag of finished rows and the previews in use.
#[derive(Debug, Default)]
pub struct ThumbList {
    copy_states: HashMap<ItemKey, CopyState>,
    previews: PreviewRegistry,
}

/// Output of one [`ThumbList::render`] pass.
#[derive(Debug, Default)]
pub struct RenderPass {
    pub rows: Vec<RowView>,
    /// Preview URIs no row uses any more; the host should free them.
    pub released_previews: Vec<String>,
    /// Clipboard failures that settled since the last pass.
    pub alerts: Vec<String>,
}

impl ThumbList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives the whole list from the current snapshot, in its order.
    pub fn render(&mut self, items: &[(ItemKey, PendingItem)]) -> RenderPass {
        let released_previews = self.previews.sync(items);

        let mut alerts = Vec::new();
        for state in self.copy_states.values_mut() {
            alerts.extend(state.poll());
        }
        // A row that left the list keeps its state until its writes settle,
        // so a late failure still raises its alert.
        self.copy_states.retain(|key, state| {
            !state.is_settled() || items.iter().any(|(k, item)| k == key && item.is_done())
        });

        let rows = items
            .iter()
            .map(|(key, item)| {
                let view = match item {
                    PendingItem::Done { .. } => present(item),
                    _ => present_pending(item).map(ItemView::Pending),
                };
                if let Err(e) = &view {
                    error!("Cannot render upload {}: {}", key, e);
                }
                RowView { key: *key, view }
            })
            .collect();

        RenderPass {
            rows,
            released_previews,
            alerts,
        }
    }

    /// Row state for a finished item; created on first use.
    pub fn copy_state(&mut self, key: ItemKey) -> &mut CopyState {
        self.copy_states.entry(key).or_default()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{ImageId, LocalFile};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            std::thread::sleep(Duration::from_millis(50));
            Err(ClipboardError::Rejected("permission denied".into()))
        }
    }

    fn file(name: &str) -> LocalFile {
        LocalFile::new(format!("/photos/{}", name))
    }

    #[test]
    fn bad_row_does_not_take_down_the_list() {
        let items = vec![
            (ItemKey(0), PendingItem::Queued { file: file("a.jpg") }),
            (
                ItemKey(1),
                PendingItem::Uploading {
                    file: file("b.jpg"),
                    progress: 7.0,
                },
            ),
            (
                ItemKey(2),
                PendingItem::Done {
                    base: ImageId::new("/img/c"),
                },
            ),
        ];
        let pass = ThumbList::new().render(&items);

        assert_eq!(pass.rows.len(), 3);
        assert!(pass.rows[0].view.is_ok());
        assert!(matches!(
            pass.rows[1].view,
            Err(InvariantViolation::InvalidProgress { .. })
        ));
        assert!(matches!(pass.rows[2].view, Ok(ItemView::Done(_))));
    }

    #[test]
    fn copy_state_is_dropped_when_row_leaves() {
        let mut list = ThumbList::new();
        let done = vec![(
            ItemKey(3),
            PendingItem::Done {
                base: ImageId::new("/img/c"),
            },
        )];
        list.render(&done);
        list.copy_state(ItemKey(3));
        assert_eq!(list.copy_states.len(), 1);

        list.render(&done);
        assert_eq!(list.copy_states.len(), 1);

        list.render(&[]);
        assert!(list.copy_states.is_empty());
    }

    #[test]
    fn preserves_snapshot_order() {
        let items: Vec<_> = [5, 1, 3]
            .into_iter()
            .map(|n| (ItemKey(n), PendingItem::Starting { file: file("x.jpg") }))
            .collect();
        let keys: Vec<_> = ThumbList::new()
            .render(&items)
            .rows
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec![ItemKey(5), ItemKey(1), ItemKey(3)]);
    }

    #[test]
    fn failed_copy_alerts_after_row_is_cleared() {
        let mut list = ThumbList::new();
        let key = ItemKey(4);
        let done = vec![(
            key,
            PendingItem::Done {
                base: ImageId::new("/img/d"),
            },
        )];
        list.render(&done);
        let location = url::Url::parse("https://photos.example/").unwrap();
        list.copy_state(key)
            .start_copy(Arc::new(DeniedClipboard), &location, &ImageId::new("/img/d"))
            .unwrap();

        let mut alerts = list.render(&[]).alerts;

        let deadline = Instant::now() + Duration::from_secs(5);
        while alerts.is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            alerts.extend(list.render(&[]).alerts);
        }
        alerts.extend(list.render(&[]).alerts);

        assert_eq!(alerts, vec!["Failed to copy to clipboard: permission denied"]);
        assert!(list.copy_states.is_empty());
    }
}
