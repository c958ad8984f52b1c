use super::SafeDocsApp;
use crate::api::RemoteFile;
use crate::utils::color::{ERROR, MUTED};
use crate::utils::file_kind::FileKind;
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, RichText};
use rfd::FileDialog;
use tracing::warn;

enum FileAction {
    Download(RemoteFile),
    Delete(String),
}

fn created_label(file: &RemoteFile) -> String {
    file.created_at
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

impl SafeDocsApp {
    pub(super) fn render_explorer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("My files");
            ui.add_space(10.0);
            let refresh = egui::Button::new("🔄 Refresh");
            if ui.add_enabled(!self.explorer.loading, refresh).clicked() {
                self.refresh_files();
            }
        });
        ui.add_space(10.0);

        if self.explorer.loading {
            ui.vertical_centered(|ui| ui.spinner());
            return;
        }

        if let Some(error) = &self.explorer.error_message {
            ui.colored_label(ERROR, error);
            return;
        }

        if let Some((path, bytes)) = self.explorer.last_download.clone() {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Saved {} to {}",
                    FileSizeUtils::format_size(bytes),
                    path.display()
                ));
                if ui.small_button("Open folder").clicked() {
                    if let Some(dir) = path.parent() {
                        if let Err(e) = open::that(dir) {
                            warn!(error = %e, "Failed to open download folder");
                        }
                    }
                }
                if ui.small_button("✖").clicked() {
                    self.explorer.last_download = None;
                }
            });
            ui.add_space(8.0);
        }

        if self.explorer.files.is_empty() {
            ui.label(RichText::new("No files uploaded yet.").color(MUTED));
            return;
        }

        let mut actions = Vec::new();
        egui::Grid::new("explorer_files")
            .striped(true)
            .num_columns(6)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                for header in ["", "Name", "Size", "Version", "Created", "Actions"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for file in &self.explorer.files {
                    let busy = self.explorer.is_busy(&file.id);
                    ui.label(FileKind::from_name(&file.name).icon());
                    let owner = file.created_by.as_deref().unwrap_or("unknown");
                    ui.label(&file.name)
                        .on_hover_text(format!("{} · owner: {}", file.content_type, owner));
                    ui.label(FileSizeUtils::listing_label(file.size));
                    ui.label(file.version.to_string());
                    ui.label(created_label(file));
                    ui.horizontal(|ui| {
                        if busy {
                            ui.spinner();
                            return;
                        }
                        if ui.small_button("⬇").on_hover_text("Download").clicked() {
                            actions.push(FileAction::Download(file.clone()));
                        }
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            actions.push(FileAction::Delete(file.id.clone()));
                        }
                    });
                    ui.end_row();
                }
            });

        for action in actions {
            match action {
                FileAction::Download(file) => {
                    let dest = FileDialog::new()
                        .set_directory(self.settings.download_dir_or_default())
                        .set_file_name(&file.name)
                        .save_file();
                    if let Some(dest) = dest {
                        self.download_file(&file, dest);
                    }
                }
                FileAction::Delete(id) => self.delete_file(id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn created_label_formats_or_dashes() {
        let mut file = RemoteFile {
            id: "f".to_string(),
            name: "a.pdf".to_string(),
            size: 0,
            content_type: String::new(),
            version: 1,
            created_at: None,
            created_by: None,
        };
        assert_eq!(created_label(&file), "—");

        file.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());
        assert_eq!(created_label(&file), "01/05/2024 10:30");
    }
}
