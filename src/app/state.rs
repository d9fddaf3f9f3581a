use crate::upload::{ItemKey, LocalFile, PendingItem, UploadEvent, UploadQueue};
use derivative::Derivative;
use log::warn;
use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub queued: usize,
    pub in_flight: usize,
    pub done: usize,
    pub failed: usize,
}

impl QueueCounts {
    pub fn total(&self) -> usize {
        self.queued + self.in_flight + self.done + self.failed
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploadState {
    pub queue: UploadQueue,
    /// Blocking notifications, shown one at a time until dismissed.
    pub alerts: VecDeque<String>,
    pub error_message: Option<String>,
    /// Items already handed to a worker, which may not have reported yet.
    dispatched: HashSet<ItemKey>,
    #[derivative(Debug = "ignore")]
    status_sender: Sender<UploadEvent>,
    #[derivative(Debug = "ignore")]
    status_receiver: Receiver<UploadEvent>,
}

impl Default for UploadState {
    fn default() -> Self {
        let (status_sender, status_receiver) = channel();
        Self {
            queue: UploadQueue::new(),
            alerts: VecDeque::new(),
            error_message: None,
            dispatched: HashSet::new(),
            status_sender,
            status_receiver,
        }
    }
}

impl UploadState {
    pub fn status_sender(&self) -> Sender<UploadEvent> {
        self.status_sender.clone()
    }

    /// Applies every report that arrived since the last frame. Returns true
    /// if anything was received.
    pub fn drain_events(&mut self) -> bool {
        let mut had_updates = false;
        while let Ok(event) = self.status_receiver.try_recv() {
            had_updates = true;
            if let Err(e) = self.queue.apply(event) {
                warn!("Dropping upload report: {}", e);
            }
        }
        had_updates
    }

    /// Queued items not yet handed to a worker. Each one is returned once.
    pub fn take_undispatched(&mut self) -> Vec<(ItemKey, LocalFile)> {
        let dispatched = &mut self.dispatched;
        self.queue
            .queued()
            .into_iter()
            .filter(|(key, _)| dispatched.insert(*key))
            .collect()
    }

    pub fn push_alert(&mut self, alert: String) {
        self.alerts.push_back(alert);
    }

    /// An alert is up; everything else waits until it is dismissed.
    pub fn is_blocked(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn counts(&self) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for (_, item) in self.queue.items() {
            match item {
                PendingItem::Queued { .. } => counts.queued += 1,
                PendingItem::Starting { .. } | PendingItem::Uploading { .. } => counts.in_flight += 1,
                PendingItem::Done { .. } => counts.done += 1,
                PendingItem::Error { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn get_status_text(&self) -> String {
        let counts = self.counts();
        if counts.total() == 0 {
            return String::new();
        }
        format!(
            "{} images | ⏳ Queued: {} | 📤 Uploading: {} | ✅ Done: {} | ❌ Failed: {}",
            counts.total(),
            counts.queued,
            counts.in_flight,
            counts.done,
            counts.failed
        )
    }

    pub fn clear_finished(&mut self) {
        self.queue.clear_finished();
        let queue = &self.queue;
        self.dispatched.retain(|key| queue.get(*key).is_some());
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{ImageId, LocalFile, UploadEventKind};

    #[test]
    fn drains_reports_into_queue() {
        let mut state = UploadState::default();
        let a = state.queue.enqueue(LocalFile::new("a.jpg"));
        let b = state.queue.enqueue(LocalFile::new("b.jpg"));

        let tx = state.status_sender();
        tx.send(UploadEvent::new(a, UploadEventKind::Completed(ImageId::new("/img/a"))))
            .unwrap();
        tx.send(UploadEvent::new(b, UploadEventKind::Progress(0.2))).unwrap();
        // Stale report for a finished item is ignored.
        tx.send(UploadEvent::new(a, UploadEventKind::Started)).unwrap();

        assert!(state.drain_events());
        assert!(!state.drain_events());
        assert_eq!(
            state.counts(),
            QueueCounts {
                queued: 0,
                in_flight: 1,
                done: 1,
                failed: 0
            }
        );
        assert!(state.get_status_text().starts_with("2 images"));

        state.clear_finished();
        assert_eq!(state.queue.len(), 1);
    }

    #[test]
    fn dispatches_each_item_once() {
        let mut state = UploadState::default();
        let a = state.queue.enqueue(LocalFile::new("a.jpg"));
        assert_eq!(state.take_undispatched().len(), 1);
        assert!(state.take_undispatched().is_empty());

        let b = state.queue.enqueue(LocalFile::new("b.jpg"));
        let next: Vec<_> = state.take_undispatched().into_iter().map(|(k, _)| k).collect();
        assert_eq!(next, vec![b]);

        let tx = state.status_sender();
        tx.send(UploadEvent::new(a, UploadEventKind::Failed("boom".into())))
            .unwrap();
        state.drain_events();
        state.clear_finished();
        assert!(!state.dispatched.contains(&a));
        assert!(state.dispatched.contains(&b));
    }

    #[test]
    fn alerts_block_until_dismissed_in_order() {
        let mut state = UploadState::default();
        assert!(!state.is_blocked());

        state.push_alert("first".into());
        state.push_alert("second".into());
        assert!(state.is_blocked());

        state.dismiss_alert();
        assert_eq!(state.alerts.front().map(String::as_str), Some("second"));
        assert!(state.is_blocked());

        state.dismiss_alert();
        assert!(!state.is_blocked());
    }
}
