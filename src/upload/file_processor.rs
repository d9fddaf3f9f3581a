use crate::upload::types::{ImageId, ItemKey, LocalFile, UploadEvent, UploadEventKind};
use glob::Pattern;
use ignore::Walk;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Moves the bytes of one file to the gallery server.
///
/// `progress` takes a fraction in `0.0..=1.0`, or NaN when the transport
/// cannot tell how far along it is.
pub trait Uploader: Send + Sync {
    fn upload(&self, file: &LocalFile, progress: &mut dyn FnMut(f64)) -> Result<ImageId, String>;
}

/// Decides which files count as images and collects them.
#[derive(Clone, Debug)]
pub struct FileProcessor {
    patterns: Vec<Pattern>,
}

impl FileProcessor {
    pub fn new(image_patterns: &[String]) -> Self {
        let patterns = image_patterns
            .iter()
            .filter_map(|p| match Pattern::new(&p.to_lowercase()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid image pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();
        self.patterns.iter().any(|p| p.matches(&name))
    }

    /// Every supported file below `folder`, honouring ignore files.
    pub fn collect_folder(&self, folder: &Path) -> Vec<LocalFile> {
        let mut files = Vec::new();
        for entry in Walk::new(folder) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.is_supported_file(path) {
                        files.push(LocalFile::new(path));
                    }
                }
                Err(e) => warn!("Skipping unreadable entry under {}: {}", folder.display(), e),
            }
        }
        info!("Found {} images in {}", files.len(), folder.display());
        files
    }

    /// Filters user-picked paths; folders are expanded.
    pub fn collect_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<LocalFile> {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                files.extend(self.collect_folder(path));
            } else if self.is_supported_file(path) {
                files.push(LocalFile::new(path));
            } else {
                debug!("Not an image, skipping {}", path.display());
            }
        }
        files
    }
}

/// Uploads `jobs` one after another on a worker thread, reporting every step
/// through `status_sender`.
pub fn spawn_uploads(
    uploader: Arc<dyn Uploader>,
    jobs: Vec<(ItemKey, LocalFile)>,
    status_sender: Sender<UploadEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for (key, file) in jobs {
            if status_sender
                .send(UploadEvent::new(key, UploadEventKind::Started))
                .is_err()
            {
                debug!("Upload receiver gone, stopping worker");
                return;
            }

            let sender = status_sender.clone();
            let mut report = |progress: f64| {
                let _ = sender.send(UploadEvent::new(key, UploadEventKind::Progress(progress)));
            };

            let kind = match uploader.upload(&file, &mut report) {
                Ok(base) => {
                    info!("Uploaded {} as {}", file.path.display(), base);
                    UploadEventKind::Completed(base)
                }
                Err(e) => {
                    warn!("Upload of {} failed: {}", file.path.display(), e);
                    UploadEventKind::Failed(e)
                }
            };
            let _ = status_sender.send(UploadEvent::new(key, kind));
        }
    })
}
