use super::SafeDocsApp;
use crate::upload::{UploadState, UploadTask};
use crate::utils::color::{ERROR, MUTED, SUCCESS};
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use std::path::PathBuf;

enum RowAction {
    Start(u64),
    Pause(u64),
    Cancel(u64),
    Remove(u64),
}

impl SafeDocsApp {
    pub(super) fn render_upload(&mut self, ui: &mut egui::Ui) {
        self.collect_dropped_files(ui.ctx());

        ui.vertical_centered(|ui| {
            ui.heading("Upload documents");
            ui.add_space(5.0);
            ui.label(
                RichText::new("Drag your files here, or pick them below")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });
        ui.add_space(16.0);

        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(
                2.0,
                if hovering { self.accent } else { MUTED },
            ))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("☁").size(32.0));
                    ui.horizontal(|ui| {
                        ui.add_space((ui.available_width() - 260.0).max(0.0) / 2.0);
                        if ui.button("📄 Select Files").clicked() {
                            if let Some(paths) = FileDialog::new().pick_files() {
                                self.add_files(paths);
                            }
                        }
                        if ui.button("📁 Add Folder").clicked() {
                            if let Some(folder) = FileDialog::new().pick_folder() {
                                self.add_folder(folder);
                            }
                        }
                    });
                });
            });

        ui.add_space(16.0);

        if self.uploads.is_empty() {
            ui.label("No files available to display.");
            return;
        }

        ui.horizontal(|ui| {
            let can_start = !self.uploads.startable_ids().is_empty();
            if ui
                .add_enabled(can_start, egui::Button::new("📤 Upload All"))
                .clicked()
            {
                self.start_all();
            }
            if ui.button("🧹 Clear Completed").clicked() {
                self.uploads.clear_completed();
            }
        });
        ui.label(self.uploads.get_status_text());
        ui.add_space(8.0);

        let mut actions = Vec::new();
        for task in self.uploads.iter() {
            render_row(ui, task, self.accent, &mut actions);
            ui.add_space(4.0);
        }

        for action in actions {
            match action {
                RowAction::Start(id) => self.start_upload(id),
                RowAction::Pause(id) => self.pause_upload(id),
                RowAction::Cancel(id) => self.cancel_upload(id),
                RowAction::Remove(id) => self.remove_upload(id),
            }
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }

        let (folders, files): (Vec<PathBuf>, Vec<PathBuf>) =
            dropped.into_iter().partition(|p| p.is_dir());
        if !files.is_empty() {
            self.add_files(files);
        }
        for folder in folders {
            self.add_folder(folder);
        }
    }
}

fn render_row(ui: &mut egui::Ui, task: &UploadTask, accent: Color32, actions: &mut Vec<RowAction>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(task.kind.icon()).size(26.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(&task.name).strong());
                ui.label(RichText::new(&task.size_label).small().color(MUTED));
            });

            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                if task.state() == UploadState::Completed {
                    if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                        actions.push(RowAction::Remove(task.id));
                    }
                    ui.label(RichText::new("✅").size(22.0).color(SUCCESS));
                    return;
                }

                if ui.button("✖").on_hover_text("Cancel").clicked() {
                    actions.push(RowAction::Cancel(task.id));
                }
                if task.state() == UploadState::Uploading {
                    let pause = egui::Button::new(RichText::new("⏸").color(ERROR));
                    if ui.add(pause).on_hover_text("Pause").clicked() {
                        actions.push(RowAction::Pause(task.id));
                    }
                } else {
                    let start = egui::Button::new(RichText::new("▶").color(SUCCESS));
                    if ui.add(start).on_hover_text("Start").clicked() {
                        actions.push(RowAction::Start(task.id));
                    }
                    if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                        actions.push(RowAction::Remove(task.id));
                    }
                }
                ui.label(RichText::new(task.state().label()).small().color(MUTED));
            });
        });

        let bar = egui::ProgressBar::new(f32::from(task.progress()) / 100.0)
            .text(task.progress_label())
            .animate(task.state() == UploadState::Uploading)
            .fill(accent);
        ui.add(bar);

        if let Some(err) = task.last_error() {
            ui.colored_label(ERROR, err);
        }
    });
}
