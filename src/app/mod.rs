mod state;
mod ui;

use crate::backup::{BackupControl, GallerySpec};
use crate::config::AppConfig;
use crate::thumb::{Clipboard, ClipboardError, ThumbList};
use crate::upload::{spawn_uploads, FileProcessor, Uploader};
use crate::utils::color::accent_or_default;
use eframe::{egui, App};
use log::{info, warn};
pub use state::{QueueCounts, UploadState};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use url::Url;

/// Hands clipboard writes from worker threads to the UI thread, which is the
/// only place egui accepts them.
#[derive(Default)]
pub struct EguiClipboard {
    pending: Mutex<Vec<String>>,
}

impl Clipboard for EguiClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.pending
            .lock()
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

impl EguiClipboard {
    fn flush(&self, ctx: &egui::Context) {
        let text = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).last(),
            Err(e) => {
                warn!("Clipboard buffer poisoned: {}", e);
                None
            }
        };
        if let Some(text) = text {
            ctx.output_mut(|o| o.copied_text = text);
        }
    }
}

pub struct GalleryUploader {
    server: Url,
    processor: FileProcessor,
    state: UploadState,
    thumbs: ThumbList,
    backup: BackupControl,
    clipboard: Arc<EguiClipboard>,
    uploader: Option<Arc<dyn Uploader>>,
    accent: egui::Color32,
}

impl GalleryUploader {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        server: Url,
        gallery: Option<GallerySpec>,
        uploader: Option<Arc<dyn Uploader>>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        info!("Initializing gallery uploader against {}", server);

        let mut app = Self {
            server,
            processor: FileProcessor::new(&config.image_patterns),
            state: UploadState::default(),
            thumbs: ThumbList::new(),
            backup: BackupControl::new(),
            clipboard: Arc::new(EguiClipboard::default()),
            uploader,
            accent: accent_or_default(&config.accent_color),
        };
        if app.uploader.is_none() {
            warn!("No uploader attached; images will stay queued");
        }
        if let Some(spec) = gallery {
            app.backup.set_gallery(spec);
            app.backup.start_sync(app.server.clone());
        }
        app
    }

    /// Accepts files (or folders of files) into the upload queue.
    pub fn add_files(&mut self, paths: &[PathBuf]) {
        let files = self.processor.collect_paths(paths);
        if files.is_empty() {
            if !paths.is_empty() {
                self.state.error_message = Some("No supported images selected".to_string());
            }
            return;
        }
        info!("Queueing {} images", files.len());
        self.state.error_message = None;
        for file in files {
            self.state.queue.enqueue(file);
        }
        self.start_uploads();
    }

    fn start_uploads(&mut self) {
        let Some(uploader) = &self.uploader else {
            return;
        };
        let jobs = self.state.take_undispatched();
        if jobs.is_empty() {
            return;
        }
        spawn_uploads(uploader.clone(), jobs, self.state.status_sender());
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.state.drain_events() {
            ctx.request_repaint();
        }
        if self.backup.poll() {
            ctx.request_repaint();
        }
        self.clipboard.flush(ctx);

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() && !self.state.is_blocked() {
            self.add_files(&dropped);
        }

        // Uploads, clipboard writes and the gallery sync all report back
        // asynchronously; keep polling while any may be outstanding.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

impl App for GalleryUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
