use crate::api::RemoteFile;
use crate::error::ClientError;
use crate::session::Session;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    SignIn,
    SignUp,
    Upload,
    Explorer,
}

impl Screen {
    /// Protected screens need a session; without one the app shows sign in.
    pub fn is_protected(self) -> bool {
        matches!(self, Screen::Upload | Screen::Explorer)
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::SignIn => "Sign in",
            Screen::SignUp => "Get started",
            Screen::Upload => "Upload",
            Screen::Explorer => "My files",
        }
    }
}

#[derive(Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub submitting: bool,
}

#[derive(Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub submitting: bool,
}

#[derive(Default)]
pub struct ExplorerState {
    pub files: Vec<RemoteFile>,
    pub loading: bool,
    pub loaded: bool,
    pub error_message: Option<String>,
    pub busy_ids: Vec<String>,
    pub last_download: Option<(PathBuf, u64)>,
}

impl ExplorerState {
    pub fn clear(&mut self) {
        *self = ExplorerState::default();
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy_ids.iter().any(|b| b == id)
    }

    pub fn set_idle(&mut self, id: &str) {
        self.busy_ids.retain(|b| b != id);
    }
}

/// Modal alerts, shown one at a time in arrival order.
#[derive(Default)]
pub struct Alerts {
    queue: VecDeque<String>,
}

impl Alerts {
    pub fn push(&mut self, message: impl Into<String>) {
        self.queue.push_back(message.into());
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }
}

/// Results of background requests, drained on the UI thread.
pub enum Outcome {
    LoggedIn(Result<Session, ClientError>),
    Registered(Result<(), ClientError>),
    Listed(Result<Vec<RemoteFile>, ClientError>),
    Deleted {
        id: String,
        result: Result<(), ClientError>,
    },
    Downloaded {
        id: String,
        path: PathBuf,
        result: Result<u64, ClientError>,
    },
}
