use std::fmt;
use std::path::{Path, PathBuf};

/// A file the user handed to us, valid for the lifetime of this session only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: Option<String>,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Stable relative reference to an image the server has durably stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    pub const THUMB_SUFFIX: &'static str = ".thumb.jpg";

    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Where the full-resolution image lives.
    pub fn link(&self) -> String {
        self.0.clone()
    }

    /// Storage layer convention: the thumbnail sits next to the image.
    pub fn thumbnail(&self) -> String {
        format!("{}{}", self.0, Self::THUMB_SUFFIX)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a queue entry, stable across state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub u64);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where one image is in its upload journey.
///
/// `progress` is a fraction in `0.0..=1.0`, or NaN when the transport cannot
/// report progress at all.
#[derive(Debug, Clone)]
pub enum PendingItem {
    Queued { file: LocalFile },
    Starting { file: LocalFile },
    Uploading { file: LocalFile, progress: f64 },
    Done { base: ImageId },
    Error { file: LocalFile, error: String },
}

impl PendingItem {
    pub fn state_name(&self) -> &'static str {
        match self {
            PendingItem::Queued { .. } => "queued",
            PendingItem::Starting { .. } => "starting",
            PendingItem::Uploading { .. } => "uploading",
            PendingItem::Done { .. } => "done",
            PendingItem::Error { .. } => "error",
        }
    }

    /// Position along `queued -> starting -> uploading -> {done | error}`.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            PendingItem::Queued { .. } => 0,
            PendingItem::Starting { .. } => 1,
            PendingItem::Uploading { .. } => 2,
            PendingItem::Done { .. } | PendingItem::Error { .. } => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PendingItem::Done { .. } | PendingItem::Error { .. })
    }

    pub fn is_done(&self) -> bool {
        matches!(self, PendingItem::Done { .. })
    }

    /// The local file, for every state that still has one.
    pub fn file(&self) -> Option<&LocalFile> {
        match self {
            PendingItem::Queued { file }
            | PendingItem::Starting { file }
            | PendingItem::Uploading { file, .. }
            | PendingItem::Error { file, .. } => Some(file),
            PendingItem::Done { .. } => None,
        }
    }
}

/// Progress report from whoever is moving the bytes.
#[derive(Debug, Clone)]
pub struct UploadEvent {
    pub key: ItemKey,
    pub kind: UploadEventKind,
}

#[derive(Debug, Clone)]
pub enum UploadEventKind {
    Started,
    Progress(f64),
    Completed(ImageId),
    Failed(String),
}

impl UploadEvent {
    pub fn new(key: ItemKey, kind: UploadEventKind) -> Self {
        Self { key, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_appends_suffix() {
        let id = ImageId::new("/img/abc123");
        assert_eq!(id.link(), "/img/abc123");
        assert_eq!(id.thumbnail(), "/img/abc123.thumb.jpg");
    }

    #[test]
    fn local_file_takes_name_from_path() {
        let file = LocalFile::new("/photos/a.jpg");
        assert_eq!(file.name.as_deref(), Some("a.jpg"));
        assert_eq!(LocalFile::new("/").name, None);
    }

    #[test]
    fn done_has_no_file() {
        let done = PendingItem::Done {
            base: ImageId::new("x"),
        };
        assert!(done.file().is_none());
        assert!(done.is_terminal());
        assert_eq!(done.state_name(), "done");
    }
}
