use derivative::Derivative;
use log::{debug, warn};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::upload::ImageId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("invalid link {link}: {reason}")]
    BadLink { link: String, reason: String },
    #[error("{0}")]
    Rejected(String),
}

/// System clipboard. Writes may fail and may be slow, so they never run on
/// the UI thread.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Absolute URL of a stored image, resolved against the page location.
pub fn resolve_link(location: &Url, base: &ImageId) -> Result<Url, ClipboardError> {
    location
        .join(base.as_str())
        .map_err(|e| ClipboardError::BadLink {
            link: base.to_string(),
            reason: e.to_string(),
        })
}

pub fn failure_alert(err: &ClipboardError) -> String {
    format!("Failed to copy to clipboard: {}", err)
}

/// Transient "copied!" acknowledgement for one finished row.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CopyState {
    copied: bool,
    hovered: bool,
    /// Writes started but not yet picked up by `poll`.
    in_flight: usize,
    #[derivative(Debug = "ignore")]
    sender: Sender<Result<(), ClipboardError>>,
    #[derivative(Debug = "ignore")]
    receiver: Receiver<Result<(), ClipboardError>>,
}

impl Default for CopyState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            copied: false,
            hovered: false,
            in_flight: 0,
            sender,
            receiver,
        }
    }
}

impl CopyState {
    pub fn copied(&self) -> bool {
        self.copied
    }

    /// True once every started write has been picked up by `poll`.
    pub fn is_settled(&self) -> bool {
        self.in_flight == 0
    }

    pub fn label(&self) -> &'static str {
        if self.copied {
            "copied!"
        } else {
            "copy"
        }
    }

    /// Starts an asynchronous clipboard write. The outcome is picked up by
    /// [`CopyState::poll`]; a bad link fails right away.
    pub fn start_copy(
        &mut self,
        clipboard: Arc<dyn Clipboard>,
        location: &Url,
        base: &ImageId,
    ) -> Result<(), ClipboardError> {
        let url = resolve_link(location, base)?;
        let sender = self.sender.clone();
        debug!("Copying {} to clipboard", url);
        std::thread::spawn(move || {
            let _ = sender.send(clipboard.write_text(url.as_str()));
        });
        self.in_flight += 1;
        Ok(())
    }

    /// Applies settled writes in the order they finished. Returns the alerts
    /// to raise, one per failed write.
    pub fn poll(&mut self) -> Vec<String> {
        let mut alerts = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            match outcome {
                Ok(()) => self.copied = true,
                Err(e) => {
                    warn!("Clipboard write failed: {}", e);
                    alerts.push(failure_alert(&e));
                }
            }
        }
        alerts
    }

    pub fn pointer_left(&mut self) {
        self.copied = false;
    }

    /// Feeds the button's hover state each frame; leaving clears the flag.
    pub fn track_hover(&mut self, hovered: bool) {
        if self.hovered && !hovered {
            self.pointer_left();
        }
        self.hovered = hovered;
    }
}
