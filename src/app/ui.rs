use super::{SafeDocsApp, Screen};
use eframe::egui::{self, Align, Align2, RichText};

impl SafeDocsApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        self.render_header(ctx);
        self.render_footer(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                match self.screen {
                    Screen::SignIn => self.render_sign_in(ui),
                    Screen::SignUp => self.render_sign_up(ui),
                    Screen::Upload => self.render_upload(ui),
                    Screen::Explorer => self.render_explorer(ui),
                }
                ui.add_space(20.0);
            });
        });

        self.render_alert(ctx);
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("SafeDocs 📁").heading().color(self.accent));
                ui.add_space(12.0);

                if self.session.is_some() {
                    for screen in [Screen::Upload, Screen::Explorer] {
                        if ui
                            .selectable_label(self.screen == screen, screen.title())
                            .clicked()
                        {
                            self.navigate(screen);
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("🚪 Logout").clicked() {
                            self.logout();
                        }
                    });
                }
            });
            ui.add_space(6.0);
        });
    }

    fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!(
                        "auth: {}  |  files: {}",
                        self.settings.auth_url, self.settings.files_url
                    ))
                    .small()
                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
                );
            });
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alerts.current().map(str::to_string) else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("SafeDocs")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.label(message);
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.alerts.dismiss();
        }
    }
}
