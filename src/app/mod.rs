mod auth_view;
mod explorer_view;
mod state;
mod ui;
mod upload_view;

use crate::api::{validate_login, validate_registration, AuthClient, FilesClient, RemoteFile};
use crate::error::ClientError;
use crate::session::{Session, SessionStore};
use crate::settings::Settings;
use crate::upload::{Notify, TransferUpdate, TransferWorker, UploadJob, UploadList, UploadState};
use crate::utils::color::accent_from_settings;
use eframe::egui::{self, Color32};
use eframe::App;
use state::{Alerts, ExplorerState, Outcome, SignInForm, SignUpForm};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::sync::Arc;
use tracing::{error, info, warn};

pub use state::Screen;

const LOGIN_REQUIRED: &str = "You must be logged in to upload files.";
const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

pub struct SafeDocsApp {
    settings: Settings,
    data_dir: PathBuf,
    runtime: tokio::runtime::Runtime,
    ctx: egui::Context,
    auth: AuthClient,
    files: FilesClient,
    session_store: SessionStore,
    session: Option<Session>,
    screen: Screen,
    alerts: Alerts,
    sign_in: SignInForm,
    sign_up: SignUpForm,
    uploads: UploadList,
    worker: TransferWorker,
    update_receiver: Receiver<TransferUpdate>,
    explorer: ExplorerState,
    outcome_sender: Sender<Outcome>,
    outcome_receiver: Receiver<Outcome>,
    accent: Color32,
}

impl SafeDocsApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        Self::with_context(cc.egui_ctx.clone(), settings, data_dir, runtime)
    }

    pub fn with_context(
        ctx: egui::Context,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let client = reqwest::Client::new();
        let auth = AuthClient::new(client.clone(), settings.auth_url.clone());
        let files = FilesClient::new(
            client,
            settings.files_url.clone(),
            settings.upload_endpoint(),
        );

        let (update_sender, update_receiver) = std_mpsc::channel();
        let repaint_ctx = ctx.clone();
        let notify: Notify = Arc::new(move || repaint_ctx.request_repaint());
        let worker = TransferWorker::new(
            files.clone(),
            runtime.handle().clone(),
            update_sender,
            notify,
        );

        let session_store = SessionStore::new(&data_dir);
        let session = match session_store.load() {
            Some(session) if session.is_expired() => {
                info!("Stored session has expired");
                session_store.clear();
                None
            }
            other => other,
        };
        let screen = if session.is_some() {
            Screen::Upload
        } else {
            Screen::SignIn
        };

        let (outcome_sender, outcome_receiver) = std_mpsc::channel();
        let accent = accent_from_settings(&settings.accent_color);

        info!(
            auth_url = %settings.auth_url,
            files_url = %settings.files_url,
            signed_in = session.is_some(),
            "SafeDocs client initialized"
        );

        Self {
            settings,
            data_dir,
            runtime,
            ctx,
            auth,
            files,
            session_store,
            session,
            screen,
            alerts: Alerts::default(),
            sign_in: SignInForm::default(),
            sign_up: SignUpForm::default(),
            uploads: UploadList::new(),
            worker,
            update_receiver,
            explorer: ExplorerState::default(),
            outcome_sender,
            outcome_receiver,
            accent,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn navigate(&mut self, screen: Screen) {
        if screen.is_protected() && self.session.is_none() {
            warn!(screen = ?screen, "Redirecting to sign in");
            self.screen = Screen::SignIn;
            return;
        }
        self.screen = screen;
        if screen == Screen::Explorer && !self.explorer.loaded && !self.explorer.loading {
            self.refresh_files();
        }
    }

    fn spawn_request<F>(&self, request: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let sender = self.outcome_sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let outcome = request.await;
            let _ = sender.send(outcome);
            ctx.request_repaint();
        });
    }

    // ---- auth ----

    pub fn submit_sign_in(&mut self) {
        if let Err(e) = validate_login(&self.sign_in.email, &self.sign_in.password) {
            self.alerts.push(e.to_string());
            return;
        }
        self.sign_in.submitting = true;
        let auth = self.auth.clone();
        let email = self.sign_in.email.trim().to_string();
        let password = self.sign_in.password.clone();
        self.spawn_request(async move { Outcome::LoggedIn(auth.login(&email, &password).await) });
    }

    pub fn submit_sign_up(&mut self) {
        let form = &self.sign_up;
        if let Err(e) = validate_registration(&form.username, &form.email, &form.password) {
            self.alerts.push(e.to_string());
            return;
        }
        self.sign_up.submitting = true;
        let auth = self.auth.clone();
        let username = self.sign_up.username.trim().to_string();
        let email = self.sign_up.email.trim().to_string();
        let password = self.sign_up.password.clone();
        self.spawn_request(async move {
            Outcome::Registered(auth.register(&username, &email, &password).await)
        });
    }

    pub fn logout(&mut self) {
        info!("Logging out");
        self.end_session();
        self.navigate(Screen::SignIn);
    }

    fn end_session(&mut self) {
        self.session_store.clear();
        self.session = None;
        self.explorer.clear();
        for id in self.uploads.ids() {
            if let Some(task) = self.uploads.get_mut(id) {
                task.pause();
            }
        }
    }

    /// Signs out an expired session and keeps protected screens behind sign in.
    pub fn enforce_session(&mut self) {
        if self.session.as_ref().is_some_and(Session::is_expired) {
            warn!("Session expired, logging out");
            self.end_session();
            self.alerts.push(SESSION_EXPIRED);
        }
        if self.screen.is_protected() && self.session.is_none() {
            self.screen = Screen::SignIn;
        }
    }

    // ---- uploads ----

    pub fn start_upload(&mut self, id: u64) {
        let Some(session) = self.session.clone() else {
            error!("Authentication token not found");
            self.alerts.push(LOGIN_REQUIRED);
            return;
        };
        let Some(task) = self.uploads.get_mut(id) else {
            return;
        };
        let Some(attempt) = task.start() else {
            return;
        };

        let job = UploadJob {
            task_id: id,
            attempt,
            path: task.path.clone(),
            file_name: task.name.clone(),
            size_label: task.size_label.clone(),
        };
        self.worker.spawn(job, session);
    }

    pub fn start_all(&mut self) {
        if self.session.is_none() {
            self.alerts.push(LOGIN_REQUIRED);
            return;
        }
        for id in self.uploads.startable_ids() {
            self.start_upload(id);
        }
    }

    pub fn pause_upload(&mut self, id: u64) {
        if let Some(task) = self.uploads.get_mut(id) {
            task.pause();
        }
    }

    pub fn cancel_upload(&mut self, id: u64) {
        if let Some(task) = self.uploads.get_mut(id) {
            task.cancel();
        }
    }

    pub fn remove_upload(&mut self, id: u64) {
        if let Some(task) = self.uploads.remove(id) {
            info!(file = %task.name, "Removed from upload list");
        }
    }

    pub fn add_files(&mut self, paths: Vec<PathBuf>) {
        let added = self.uploads.add_paths(paths);
        info!(added, "Files added to upload list");
    }

    pub fn add_folder(&mut self, folder: PathBuf) {
        let added = self
            .uploads
            .add_folder(&folder, &self.settings.exclude_patterns);
        info!(folder = %folder.display(), added, "Folder added to upload list");
        if added == 0 {
            self.alerts.push("No new files found in the selected folder.");
        }
    }

    // ---- explorer ----

    pub fn refresh_files(&mut self) {
        if self.session.is_none() {
            error!("Authentication token not found");
            self.alerts.push(LOGIN_REQUIRED);
            return;
        }
        self.explorer.loading = true;
        self.explorer.error_message = None;
        let files = self.files.clone();
        let session = self.session.clone();
        self.spawn_request(async move { Outcome::Listed(files.list(session.as_ref()).await) });
    }

    pub fn delete_file(&mut self, id: String) {
        if self.session.is_none() {
            error!("Authentication token not found");
            self.alerts.push(LOGIN_REQUIRED);
            return;
        }
        if self.explorer.is_busy(&id) {
            return;
        }
        self.explorer.busy_ids.push(id.clone());
        let files = self.files.clone();
        let session = self.session.clone();
        self.spawn_request(async move {
            let result = files.delete(session.as_ref(), &id).await;
            Outcome::Deleted { id, result }
        });
    }

    pub fn download_file(&mut self, file: &RemoteFile, dest: PathBuf) {
        if self.session.is_none() {
            error!("Authentication token not found");
            self.alerts.push(LOGIN_REQUIRED);
            return;
        }
        if self.explorer.is_busy(&file.id) {
            return;
        }
        if let Some(dir) = dest.parent() {
            self.settings.download_dir = Some(dir.display().to_string());
            self.settings.save(&self.data_dir);
        }

        self.explorer.busy_ids.push(file.id.clone());
        let files = self.files.clone();
        let session = self.session.clone();
        let id = file.id.clone();
        self.spawn_request(async move {
            let result = files.download(session.as_ref(), &id, &dest).await;
            Outcome::Downloaded {
                id,
                path: dest,
                result,
            }
        });
    }

    // ---- event pump ----

    pub fn update_state(&mut self) {
        while let Ok(update) = self.update_receiver.try_recv() {
            if let Some(message) = self.uploads.apply(update) {
                self.alerts.push(message);
            }
        }

        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.handle_outcome(outcome);
        }

        self.enforce_session();
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::LoggedIn(result) => {
                self.sign_in.submitting = false;
                match result {
                    Ok(session) => {
                        if let Err(e) = self.session_store.save(&session) {
                            error!(error = %e, "Failed to persist session");
                        }
                        self.session = Some(session);
                        self.sign_in.password.clear();
                        self.navigate(Screen::Upload);
                    }
                    Err(e) => {
                        error!(error = %e, "Login failed");
                        self.alerts.push(describe(&e));
                    }
                }
            }
            Outcome::Registered(result) => {
                self.sign_up.submitting = false;
                match result {
                    Ok(()) => {
                        self.sign_in.email = std::mem::take(&mut self.sign_up.email);
                        self.sign_up.password.clear();
                        self.alerts.push("Account created. Please sign in.");
                        self.navigate(Screen::SignIn);
                    }
                    Err(e) => {
                        error!(error = %e, "Registration failed");
                        self.alerts
                            .push(format!("Error creating new account: {}", describe(&e)));
                    }
                }
            }
            Outcome::Listed(result) => {
                self.explorer.loading = false;
                match result {
                    Ok(files) => {
                        self.explorer.files = files;
                        self.explorer.loaded = true;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to fetch files");
                        self.explorer.error_message = Some("Failed to fetch files.".to_string());
                    }
                }
            }
            Outcome::Deleted { id, result } => {
                self.explorer.set_idle(&id);
                match result {
                    Ok(()) => self.explorer.files.retain(|f| f.id != id),
                    Err(e) => {
                        error!(file_id = %id, error = %e, "Error deleting file");
                        self.alerts.push("Failed to delete the file");
                    }
                }
            }
            Outcome::Downloaded { id, path, result } => {
                self.explorer.set_idle(&id);
                match result {
                    Ok(bytes) => self.explorer.last_download = Some((path, bytes)),
                    Err(e) => {
                        error!(file_id = %id, error = %e, "Error downloading file");
                        self.alerts.push("Failed to download the file");
                    }
                }
            }
        }
    }
}

fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
        other => other.to_string(),
    }
}

impl App for SafeDocsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state();
        self.render(ctx);

        if self.session.as_ref().and_then(|s| s.expires_at).is_some()
            || self.uploads.count_in(UploadState::Uploading) > 0
        {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn app_in(dir: &tempfile::TempDir) -> SafeDocsApp {
        let settings = Settings {
            auth_url: "http://127.0.0.1:1".to_string(),
            files_url: "http://127.0.0.1:1".to_string(),
            ..Settings::default()
        };
        SafeDocsApp::with_context(
            egui::Context::default(),
            settings,
            dir.path().to_path_buf(),
            tokio::runtime::Runtime::new().unwrap(),
        )
    }

    fn token_expiring_at(exp: i64) -> String {
        format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp))
        )
    }

    #[test]
    fn protected_screens_require_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert_eq!(app.screen(), Screen::SignIn);

        app.navigate(Screen::Upload);
        assert_eq!(app.screen(), Screen::SignIn);
        app.navigate(Screen::SignUp);
        assert_eq!(app.screen(), Screen::SignUp);
    }

    #[test]
    fn upload_without_session_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("memo.txt");
        std::fs::write(&file, b"hello").unwrap();

        let mut app = app_in(&dir);
        app.add_files(vec![file]);
        let id = app.uploads.ids()[0];
        app.start_upload(id);

        assert_eq!(app.alerts.current(), Some(LOGIN_REQUIRED));
        assert_eq!(app.uploads.get(id).unwrap().state(), UploadState::Idle);
    }

    #[test]
    fn stored_session_restores_upload_screen() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store
            .save(&Session::from_token(token_expiring_at(4_102_444_800)))
            .unwrap();

        let mut app = app_in(&dir);
        assert_eq!(app.screen(), Screen::Upload);

        app.logout();
        assert_eq!(app.screen(), Screen::SignIn);
        assert!(store.load().is_none());
    }

    #[test]
    fn expired_session_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.session = Some(Session::from_token(token_expiring_at(1)));
        app.screen = Screen::Explorer;

        app.update_state();

        assert!(app.session.is_none());
        assert_eq!(app.screen(), Screen::SignIn);
        assert_eq!(app.alerts.current(), Some(SESSION_EXPIRED));
    }

    #[test]
    fn expired_stored_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store
            .save(&Session::from_token(token_expiring_at(1)))
            .unwrap();

        let app = app_in(&dir);
        assert_eq!(app.screen(), Screen::SignIn);
        assert!(store.load().is_none());
    }

    #[test]
    fn failed_transfer_event_raises_alert() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("memo.txt");
        std::fs::write(&file, b"hello").unwrap();

        let mut app = app_in(&dir);
        app.session = Some(Session {
            token: "tok".to_string(),
            expires_at: None,
        });
        app.add_files(vec![file]);
        let id = app.uploads.ids()[0];
        app.start_upload(id);
        assert_eq!(app.uploads.get(id).unwrap().state(), UploadState::Uploading);

        // the file service is unreachable, so the worker reports a transport failure
        for _ in 0..50 {
            app.update_state();
            if app.alerts.current().is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }

        let alert = app.alerts.current().unwrap().to_string();
        assert!(alert.starts_with("memo.txt: Upload error:"), "{}", alert);
        assert_eq!(app.uploads.get(id).unwrap().state(), UploadState::Paused);
    }

    fn remote(id: &str) -> RemoteFile {
        RemoteFile {
            id: id.to_string(),
            name: format!("{}.pdf", id),
            size: 1024,
            content_type: "application/pdf".to_string(),
            version: 1,
            created_at: None,
            created_by: None,
        }
    }

    #[test]
    fn deleted_outcome_updates_explorer() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.explorer.files = vec![remote("a"), remote("b")];
        app.explorer.busy_ids = vec!["a".to_string(), "b".to_string()];

        app.handle_outcome(Outcome::Deleted {
            id: "a".to_string(),
            result: Ok(()),
        });
        assert_eq!(app.explorer.files, vec![remote("b")]);
        assert!(!app.explorer.is_busy("a"));
        assert!(app.alerts.current().is_none());

        app.handle_outcome(Outcome::Deleted {
            id: "b".to_string(),
            result: Err(ClientError::InvalidInput("boom".to_string())),
        });
        assert_eq!(app.explorer.files, vec![remote("b")]);
        assert!(!app.explorer.is_busy("b"));
        assert_eq!(app.alerts.current(), Some("Failed to delete the file"));
    }

    #[test]
    fn explorer_actions_without_session_are_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.delete_file("a".to_string());
        assert_eq!(app.alerts.current(), Some(LOGIN_REQUIRED));
        app.alerts.dismiss();

        app.download_file(&remote("a"), dir.path().join("a.pdf"));
        assert_eq!(app.alerts.current(), Some(LOGIN_REQUIRED));
        assert!(app.explorer.busy_ids.is_empty());
        assert!(app.settings.download_dir.is_none());
    }

    #[test]
    fn sign_in_validation_happens_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.sign_in.email = "not-an-email".to_string();
        app.sign_in.password = "whatever".to_string();
        app.submit_sign_in();
        assert!(!app.sign_in.submitting);
        assert_eq!(app.alerts.current(), Some("Please enter a valid email address"));
    }
}
