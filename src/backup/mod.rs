//! Gallery backup switch shown above the upload list.
//!
//! Two surfaced states: no gallery (images stay on this machine) and a
//! configured gallery that is registered with the server on a worker thread.

mod client;
mod gallery_spec;

pub use client::{gallery_id, register_gallery, registration_body, registration_url};
pub use gallery_spec::{GallerySpec, GallerySpecError};

use derivative::Derivative;
use log::{error, info};
use std::sync::mpsc::{channel, Receiver};
use url::Url;

pub const OFF_TEXT: &str = "Gallery backup: off; stored on this machine only";
pub const OFFLINE_TEXT: &str = "backups configured but we're offline";
pub const FORM_LABEL: &str = "New backup gallery, in public-name!secret passphrase format:";
pub const FORM_PLACEHOLDER: &str = "horse!battery staple";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Pending,
    Synced(String),
    Offline,
}

/// What the backup control should draw this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupView {
    Off,
    Syncing,
    Synced { id: String, link: String },
    Offline,
    Configuring { error: Option<String> },
}

impl BackupView {
    pub fn is_warning(&self) -> bool {
        matches!(self, BackupView::Off | BackupView::Offline)
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct BackupControl {
    gallery: Option<GallerySpec>,
    status: SyncStatus,
    configuring: bool,
    pub form_text: String,
    form_error: Option<String>,
    #[derivative(Debug = "ignore")]
    status_receiver: Option<Receiver<Option<String>>>,
}

impl Default for BackupControl {
    fn default() -> Self {
        Self {
            gallery: None,
            status: SyncStatus::Offline,
            configuring: false,
            form_text: String::new(),
            form_error: None,
            status_receiver: None,
        }
    }
}

impl BackupControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gallery(&self) -> Option<&GallerySpec> {
        self.gallery.as_ref()
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn view(&self, server: &Url) -> BackupView {
        if self.configuring {
            return BackupView::Configuring {
                error: self.form_error.clone(),
            };
        }
        if self.gallery.is_none() {
            return BackupView::Off;
        }
        match &self.status {
            SyncStatus::Pending => BackupView::Syncing,
            SyncStatus::Offline => BackupView::Offline,
            SyncStatus::Synced(id) => match server.join(&format!("/gallery/{}", id)) {
                Ok(link) => BackupView::Synced {
                    id: id.clone(),
                    link: link.to_string(),
                },
                Err(e) => {
                    error!("Cannot build gallery link for {}: {}", id, e);
                    BackupView::Offline
                }
            },
        }
    }

    pub fn open_form(&mut self) {
        self.configuring = true;
        self.form_error = None;
    }

    pub fn cancel_form(&mut self) {
        self.configuring = false;
        self.form_error = None;
        self.form_text.clear();
    }

    /// Validates the form; on success the gallery is applied and needs a
    /// [`BackupControl::start_sync`].
    pub fn submit_form(&mut self) -> Result<(), GallerySpecError> {
        match GallerySpec::parse(&self.form_text) {
            Ok(spec) => {
                info!("Backup gallery set to '{}'", spec.name);
                self.set_gallery(spec);
                self.configuring = false;
                self.form_error = None;
                self.form_text.clear();
                Ok(())
            }
            Err(e) => {
                self.form_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_gallery(&mut self, spec: GallerySpec) {
        self.gallery = Some(spec);
        self.status = SyncStatus::Pending;
        self.status_receiver = None;
    }

    /// Registers the configured gallery on a background thread.
    pub fn start_sync(&mut self, server: Url) {
        let Some(gallery) = self.gallery.as_ref().map(|g| g.as_gallery().to_string()) else {
            return;
        };
        let (sender, receiver) = channel();
        self.status_receiver = Some(receiver);
        self.status = SyncStatus::Pending;

        std::thread::spawn(move || {
            let id = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(async {
                    let client = reqwest::Client::new();
                    register_gallery(&client, &server, &gallery).await
                }),
                Err(e) => {
                    error!("Failed to start runtime for gallery sync: {}", e);
                    None
                }
            };
            let _ = sender.send(id);
        });
    }

    /// Picks up the registration result, if it arrived. Returns true when the
    /// status changed.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.status_receiver else {
            return false;
        };
        match receiver.try_recv() {
            Ok(id) => {
                self.apply_result(id);
                true
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => false,
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.apply_result(None);
                true
            }
        }
    }

    fn apply_result(&mut self, id: Option<String>) {
        self.status_receiver = None;
        self.status = match id {
            Some(id) => SyncStatus::Synced(id),
            None => SyncStatus::Offline,
        };
    }
}
