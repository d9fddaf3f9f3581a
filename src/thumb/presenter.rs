//! Maps one [`PendingItem`] to what the list should show for it.
//!
//! Everything here is a pure function of the item. Anything stateful (the
//! "copied" acknowledgement, preview lifetimes) lives in the list.

use crate::upload::{ImageId, LocalFile, PendingItem};
use thiserror::Error;

pub const QUEUED_TEXT: &str = "queued";
pub const STARTING_TEXT: &str = "starting";
pub const PROGRESS_UNKNOWN_TEXT: &str = "upload progress not available";
pub const AWAITING_SERVER_TEXT: &str = "upload complete, waiting for server";
pub const TRANSFERRING_CAPTION: &str = "transferring";

/// The item is in a state the upload state machine should never produce.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("done item {base} routed to the in-progress renderer")]
    DoneInPendingRenderer { base: String },
    #[error("unreachable state {state} with progress {progress}")]
    InvalidProgress { state: &'static str, progress: f64 },
}

/// Local preview of a file that is not on the server yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSource {
    pub uri: String,
    pub alt: String,
}

impl PreviewSource {
    pub fn for_file(file: &LocalFile) -> Self {
        let alt = match &file.name {
            Some(name) => format!("preview of {}", name),
            None => "preview".to_string(),
        };
        Self {
            uri: preview_uri(file),
            alt,
        }
    }
}

/// Session-local URI the image loaders resolve straight from disk.
pub fn preview_uri(file: &LocalFile) -> String {
    format!("file://{}", file.path.display())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingBody {
    /// Plain status line under the preview.
    Message(String),
    /// Determinate bar, always below 100.
    Progress { percent: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingView {
    pub preview: PreviewSource,
    pub body: PendingBody,
}

impl PendingView {
    pub fn message(&self) -> Option<&str> {
        match &self.body {
            PendingBody::Message(msg) => Some(msg),
            PendingBody::Progress { .. } => None,
        }
    }

    pub fn percent(&self) -> Option<u8> {
        match self.body {
            PendingBody::Progress { percent } => Some(percent),
            PendingBody::Message(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoneView {
    pub base: ImageId,
    pub link: String,
    pub thumbnail: String,
}

impl DoneView {
    pub fn new(base: &ImageId) -> Self {
        Self {
            base: base.clone(),
            link: base.link(),
            thumbnail: base.thumbnail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemView {
    Done(DoneView),
    Pending(PendingView),
}

/// Routes on `done` only, like the list does.
pub fn present(item: &PendingItem) -> Result<ItemView, InvariantViolation> {
    match item {
        PendingItem::Done { base } => Ok(ItemView::Done(DoneView::new(base))),
        other => present_pending(other).map(ItemView::Pending),
    }
}

/// Status text that needs no progress bar, if any.
fn simple_message(item: &PendingItem) -> Option<String> {
    match item {
        PendingItem::Queued { .. } => Some(QUEUED_TEXT.to_string()),
        PendingItem::Starting { .. } => Some(STARTING_TEXT.to_string()),
        PendingItem::Uploading { progress, .. } => {
            if progress.is_nan() {
                Some(PROGRESS_UNKNOWN_TEXT.to_string())
            } else if valid_fraction(*progress) && percent_of(*progress) == 100 {
                Some(AWAITING_SERVER_TEXT.to_string())
            } else {
                None
            }
        }
        PendingItem::Error { error, .. } => Some(format!("error: {}", error)),
        PendingItem::Done { .. } => None,
    }
}

fn valid_fraction(progress: f64) -> bool {
    (0.0..=1.0).contains(&progress)
}

fn percent_of(progress: f64) -> u8 {
    (progress * 100.0).round() as u8
}

/// Renders anything that is not `done` yet.
pub fn present_pending(item: &PendingItem) -> Result<PendingView, InvariantViolation> {
    let file = match item {
        PendingItem::Done { base } => {
            return Err(InvariantViolation::DoneInPendingRenderer {
                base: base.to_string(),
            })
        }
        PendingItem::Queued { file }
        | PendingItem::Starting { file }
        | PendingItem::Uploading { file, .. }
        | PendingItem::Error { file, .. } => file,
    };
    let preview = PreviewSource::for_file(file);

    if let Some(msg) = simple_message(item) {
        return Ok(PendingView {
            preview,
            body: PendingBody::Message(msg),
        });
    }

    match item {
        PendingItem::Uploading { progress, .. } if valid_fraction(*progress) => Ok(PendingView {
            preview,
            body: PendingBody::Progress {
                percent: percent_of(*progress),
            },
        }),
        PendingItem::Uploading { progress, .. } => Err(InvariantViolation::InvalidProgress {
            state: item.state_name(),
            progress: *progress,
        }),
        other => Err(InvariantViolation::InvalidProgress {
            state: other.state_name(),
            progress: f64::NAN,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> LocalFile {
        LocalFile::new("/photos/a.jpg")
    }

    fn uploading(progress: f64) -> PendingItem {
        PendingItem::Uploading {
            file: file(),
            progress,
        }
    }

    #[test]
    fn queued_shows_text_and_preview() {
        let view = present_pending(&PendingItem::Queued { file: file() }).unwrap();
        assert_eq!(view.message(), Some("queued"));
        assert_eq!(view.percent(), None);
        assert_eq!(view.preview.uri, "file:///photos/a.jpg");
        assert_eq!(view.preview.alt, "preview of a.jpg");
    }

    #[test]
    fn starting_shows_text() {
        let view = present_pending(&PendingItem::Starting { file: file() }).unwrap();
        assert_eq!(view.message(), Some("starting"));
    }

    #[test]
    fn partial_progress_is_a_bar() {
        let view = present_pending(&uploading(0.42)).unwrap();
        assert_eq!(view.body, PendingBody::Progress { percent: 42 });
        assert_eq!(view.message(), None);
    }

    #[test]
    fn bar_percent_tracks_rounding_and_stays_below_100() {
        for i in 0..995 {
            let progress = i as f64 / 1000.0;
            let view = present_pending(&uploading(progress)).unwrap();
            let expected = (progress * 100.0).round() as u8;
            assert_eq!(view.percent(), Some(expected), "progress {}", progress);
            assert!(expected <= 99);
        }
    }

    #[test]
    fn unknown_progress_is_never_a_bar() {
        let view = present_pending(&uploading(f64::NAN)).unwrap();
        assert_eq!(view.message(), Some(PROGRESS_UNKNOWN_TEXT));
        assert_eq!(view.percent(), None);
    }

    #[test]
    fn full_progress_waits_for_server() {
        let view = present_pending(&uploading(1.0)).unwrap();
        assert_eq!(view.message(), Some(AWAITING_SERVER_TEXT));
        let view = present_pending(&uploading(0.996)).unwrap();
        assert_eq!(view.message(), Some(AWAITING_SERVER_TEXT));
    }

    #[test]
    fn error_text_is_prefixed() {
        let item = PendingItem::Error {
            file: file(),
            error: "network timeout".into(),
        };
        let view = present_pending(&item).unwrap();
        assert_eq!(view.message(), Some("error: network timeout"));
    }

    #[test]
    fn nameless_file_has_generic_alt() {
        let view = present_pending(&PendingItem::Queued {
            file: LocalFile::new("/"),
        })
        .unwrap();
        assert_eq!(view.preview.alt, "preview");
    }

    #[test]
    fn done_in_pending_renderer_fails_loudly() {
        let item = PendingItem::Done {
            base: ImageId::new("/img/abc123"),
        };
        let err = present_pending(&item).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::DoneInPendingRenderer {
                base: "/img/abc123".into()
            }
        );
    }

    #[test]
    fn out_of_range_progress_fails_loudly() {
        for bad in [-0.1, 1.5, f64::INFINITY, f64::NEG_INFINITY] {
            let err = present_pending(&uploading(bad)).unwrap_err();
            assert!(matches!(err, InvariantViolation::InvalidProgress { state: "uploading", .. }));
        }
    }

    #[test]
    fn done_derives_link_and_thumbnail() {
        let item = PendingItem::Done {
            base: ImageId::new("/img/abc123"),
        };
        match present(&item).unwrap() {
            ItemView::Done(view) => {
                assert_eq!(view.link, "/img/abc123");
                assert_eq!(view.thumbnail, "/img/abc123.thumb.jpg");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
