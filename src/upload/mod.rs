mod file_processor;
mod queue;
mod types;

pub use file_processor::{spawn_uploads, FileProcessor, Uploader};
pub use queue::{TransitionError, UploadQueue};
pub use types::{ImageId, ItemKey, LocalFile, PendingItem, UploadEvent, UploadEventKind};
