use super::{SafeDocsApp, Screen};
use eframe::egui::{self, RichText};

const FORM_WIDTH: f32 = 320.0;

impl SafeDocsApp {
    pub(super) fn render_sign_in(&mut self, ui: &mut egui::Ui) {
        let mut submit = false;
        let mut go_sign_up = false;

        ui.vertical_centered(|ui| {
            ui.heading("Sign in");
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - FORM_WIDTH).max(0.0) / 2.0);
                ui.label("Don’t have an account?");
                if ui.link("Get started").clicked() {
                    go_sign_up = true;
                }
            });
            ui.add_space(20.0);

            let form = &mut self.sign_in;
            ui.add(
                egui::TextEdit::singleline(&mut form.email)
                    .hint_text("Email address")
                    .desired_width(FORM_WIDTH),
            );
            ui.add_space(8.0);
            let password = ui.add(
                egui::TextEdit::singleline(&mut form.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(FORM_WIDTH),
            );
            if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.add_space(16.0);

            if form.submitting {
                ui.spinner();
            } else {
                let button = egui::Button::new("Sign in").min_size(egui::vec2(FORM_WIDTH, 36.0));
                if ui.add(button).clicked() {
                    submit = true;
                }
            }
        });

        if go_sign_up {
            self.navigate(Screen::SignUp);
        } else if submit && !self.sign_in.submitting {
            self.submit_sign_in();
        }
    }

    pub(super) fn render_sign_up(&mut self, ui: &mut egui::Ui) {
        let mut submit = false;
        let mut go_sign_in = false;

        ui.vertical_centered(|ui| {
            ui.heading("Create an account");
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - FORM_WIDTH).max(0.0) / 2.0);
                ui.label("Already have an account?");
                if ui.link("Sign in").clicked() {
                    go_sign_in = true;
                }
            });
            ui.add_space(20.0);

            let form = &mut self.sign_up;
            ui.add(
                egui::TextEdit::singleline(&mut form.username)
                    .hint_text("Username")
                    .desired_width(FORM_WIDTH),
            );
            ui.add_space(8.0);
            ui.add(
                egui::TextEdit::singleline(&mut form.email)
                    .hint_text("Email address")
                    .desired_width(FORM_WIDTH),
            );
            ui.add_space(8.0);
            ui.add(
                egui::TextEdit::singleline(&mut form.password)
                    .hint_text("Password (min. 8 characters)")
                    .password(true)
                    .desired_width(FORM_WIDTH),
            );
            ui.add_space(16.0);

            if form.submitting {
                ui.spinner();
            } else {
                let button =
                    egui::Button::new("Create account").min_size(egui::vec2(FORM_WIDTH, 36.0));
                if ui.add(button).clicked() {
                    submit = true;
                }
            }
            ui.add_space(8.0);
            ui.label(
                RichText::new("Passwords are sent to the auth service over the configured URL.")
                    .small()
                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
        });

        if go_sign_in {
            self.navigate(Screen::SignIn);
        } else if submit {
            self.submit_sign_up();
        }
    }
}
