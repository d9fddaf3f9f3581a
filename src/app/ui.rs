use super::GalleryUploader;
use crate::backup::{BackupView, FORM_LABEL, FORM_PLACEHOLDER, OFFLINE_TEXT, OFF_TEXT};
use crate::thumb::presenter::TRANSFERRING_CAPTION;
use crate::thumb::{failure_alert, DoneView, InvariantViolation, ItemView, PendingBody, PendingView};
use crate::upload::ItemKey;
use eframe::egui::{self, Align, Color32, RichText};
use log::warn;
use rfd::FileDialog;

const THUMB_SIZE: f32 = 96.0;
const WARN_COLOR: Color32 = Color32::from_rgb(220, 160, 40);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 50, 50);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(0, 150, 70);

impl GalleryUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let blocked = self.state.is_blocked();
        egui::CentralPanel::default().show(ctx, |ui| {
            // The alert is modal: nothing underneath takes input while it is up.
            ui.add_enabled_ui(!blocked, |ui| self.render_main(ui));
        });

        self.render_alert(ctx);
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        let total_height = ui.available_height();
        let footer_height = 40.0;
        let content_height = total_height - footer_height;

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.heading("Gallery Uploader");
            ui.label(
                RichText::new("Drop images here or pick them below")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });
        ui.add_space(10.0);

        self.render_backup(ui);
        ui.add_space(10.0);
        self.render_controls(ui);
        ui.add_space(10.0);

        egui::ScrollArea::vertical()
            .max_height(content_height - ui.min_rect().height())
            .auto_shrink([false, true])
            .show(ui, |ui| {
                self.render_thumbs(ui);
            });

        ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
            self.render_footer(ui);
        });
    }

    fn render_backup(&mut self, ui: &mut egui::Ui) {
        let view = self.backup.view(&self.server);
        ui.group(|ui| {
            if let BackupView::Configuring { error } = &view {
                ui.label(FORM_LABEL);
                ui.add(
                    egui::TextEdit::singleline(&mut self.backup.form_text)
                        .hint_text(FORM_PLACEHOLDER)
                        .desired_width(ui.available_width()),
                );
                if let Some(error) = error {
                    ui.colored_label(ERROR_COLOR, error);
                }
                ui.horizontal(|ui| {
                    if ui.button("sync").clicked() && self.backup.submit_form().is_ok() {
                        self.backup.start_sync(self.server.clone());
                    }
                    if ui.button("cancel").clicked() {
                        self.backup.cancel_form();
                    }
                });
                return;
            }

            ui.horizontal(|ui| {
                let color = if view.is_warning() {
                    WARN_COLOR
                } else {
                    ui.visuals().text_color()
                };
                match &view {
                    BackupView::Off => {
                        ui.colored_label(color, OFF_TEXT);
                    }
                    BackupView::Offline => {
                        ui.colored_label(color, OFFLINE_TEXT);
                    }
                    BackupView::Syncing => {
                        ui.spinner();
                        ui.label("registering backup gallery");
                    }
                    BackupView::Synced { id, link } => {
                        ui.label("backing up to");
                        ui.hyperlink_to(id, link);
                    }
                    BackupView::Configuring { .. } => {}
                }
                ui.label("|");
                if ui.button("⚙ configure").clicked() {
                    self.backup.open_form();
                }
            });
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("🖼 Select Images").clicked() {
                if let Some(paths) = FileDialog::new().pick_files() {
                    self.add_files(&paths);
                }
            }
            if ui.button("📁 Select Folder").clicked() {
                if let Some(path) = FileDialog::new().pick_folder() {
                    self.add_files(&[path]);
                }
            }
            let counts = self.state.counts();
            ui.add_enabled_ui(counts.done + counts.failed > 0, |ui| {
                if ui.button("🗑 Clear Finished").clicked() {
                    self.state.clear_finished();
                }
            });
        });
    }

    fn render_thumbs(&mut self, ui: &mut egui::Ui) {
        let pass = self.thumbs.render(self.state.queue.items());
        for uri in &pass.released_previews {
            ui.ctx().forget_image(uri);
        }
        self.state.alerts.extend(pass.alerts);

        if pass.rows.is_empty() {
            ui.label(RichText::new("Nothing queued yet").weak());
            return;
        }

        for row in &pass.rows {
            ui.push_id(row.key.0, |ui| match &row.view {
                Ok(ItemView::Done(view)) => self.render_done(ui, row.key, view),
                Ok(ItemView::Pending(view)) => render_pending(ui, view, self.accent),
                Err(e) => render_broken(ui, e),
            });
            ui.add_space(4.0);
        }
    }

    fn render_done(&mut self, ui: &mut egui::Ui, key: ItemKey, view: &DoneView) {
        let link = self.server.join(&view.link);
        let thumbnail = self.server.join(&view.thumbnail);

        ui.group(|ui| {
            ui.horizontal(|ui| {
                match (&link, &thumbnail) {
                    (Ok(link), Ok(thumbnail)) => {
                        let image = egui::Image::new(thumbnail.as_str())
                            .max_size(egui::vec2(THUMB_SIZE, THUMB_SIZE))
                            .sense(egui::Sense::click());
                        let response = ui.add(image).on_hover_text(link.as_str());
                        if response.clicked() {
                            if let Err(e) = open::that(link.as_str()) {
                                warn!("Failed to open {}: {}", link, e);
                            }
                        }
                    }
                    _ => {
                        ui.colored_label(ERROR_COLOR, format!("bad image link {}", view.link));
                    }
                }

                let copy = self.thumbs.copy_state(key);
                let fill = if copy.copied() {
                    SUCCESS_COLOR
                } else {
                    ui.visuals().widgets.inactive.weak_bg_fill
                };
                let button = ui.add(egui::Button::new(copy.label()).fill(fill));
                if button.clicked() {
                    if let Err(e) = copy.start_copy(self.clipboard.clone(), &self.server, &view.base) {
                        self.state.push_alert(failure_alert(&e));
                    }
                }
                copy.track_hover(button.hovered());
            });
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.alerts.front().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Alert")
            .id(egui::Id::new("gallery_alert"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.state.dismiss_alert();
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        if let Some(error) = &self.state.error_message {
            ui.colored_label(ERROR_COLOR, error);
        }
        let status = self.state.get_status_text();
        if !status.is_empty() {
            ui.label(status);
        }
    }
}

fn render_pending(ui: &mut egui::Ui, view: &PendingView, accent: Color32) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.add(
                egui::Image::new(view.preview.uri.as_str())
                    .max_size(egui::vec2(THUMB_SIZE, THUMB_SIZE)),
            )
            .on_hover_text(&view.preview.alt);

            ui.vertical(|ui| match &view.body {
                PendingBody::Message(msg) => {
                    ui.label(msg);
                }
                PendingBody::Progress { percent } => {
                    ui.label(TRANSFERRING_CAPTION);
                    ui.add(
                        egui::ProgressBar::new(f32::from(*percent) / 100.0)
                            .text(format!("{}%", percent))
                            .fill(accent)
                            .animate(false),
                    );
                }
            });
        });
    });
}

fn render_broken(ui: &mut egui::Ui, error: &InvariantViolation) {
    ui.group(|ui| {
        ui.colored_label(ERROR_COLOR, format!("⚠ cannot show this upload: {}", error));
    });
}
