use super::types::{TransferEvent, UploadState};
use crate::utils::file_kind::FileKind;
use crate::utils::file_size::FileSizeUtils;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// floor(sent / total * 100), clamped to 100. `None` when the total is unknown.
pub fn percent(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (u128::from(sent) * 100 / u128::from(total)).min(100);
    Some(pct as u8)
}

/// Handle for one started attempt, given to the transfer worker.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub number: u64,
    pub token: CancellationToken,
}

#[derive(Debug)]
pub struct UploadTask {
    pub id: u64,
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub size_label: String,
    pub kind: FileKind,
    state: UploadState,
    progress: u8,
    attempt: u64,
    last_error: Option<String>,
    cancel: Option<CancellationToken>,
}

impl UploadTask {
    pub fn new(id: u64, path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self {
            id,
            kind: FileKind::from_name(&name),
            size_label: FileSizeUtils::upload_label(size),
            path,
            name,
            size,
            state: UploadState::Idle,
            progress: 0,
            attempt: 0,
            last_error: None,
            cancel: None,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress)
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_startable(&self) -> bool {
        matches!(self.state, UploadState::Idle | UploadState::Paused)
    }

    /// Idle/Paused -> Uploading. The new attempt re-sends the whole file, so
    /// progress restarts at 0.
    pub fn start(&mut self) -> Option<Attempt> {
        if !self.is_startable() {
            debug!(file = %self.name, state = ?self.state, "Ignoring start");
            return None;
        }

        self.abort_in_flight();
        self.attempt += 1;
        self.state = UploadState::Uploading;
        self.progress = 0;
        self.last_error = None;

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        info!(file = %self.name, attempt = self.attempt, "Starting upload");
        Some(Attempt {
            number: self.attempt,
            token,
        })
    }

    /// Uploading -> Paused. Aborts the in-flight request and keeps progress.
    pub fn pause(&mut self) -> bool {
        if self.state != UploadState::Uploading {
            return false;
        }
        self.abort_in_flight();
        self.state = UploadState::Paused;
        info!(file = %self.name, progress = self.progress, "Pausing upload");
        true
    }

    /// Any state -> Idle with progress 0.
    pub fn cancel(&mut self) {
        self.abort_in_flight();
        self.state = UploadState::Idle;
        self.progress = 0;
        self.last_error = None;
        info!(file = %self.name, "Cancelling upload");
    }

    /// Applies a worker event. Events from superseded attempts, or arriving
    /// while not uploading, are dropped. Returns the alert text on failure.
    pub fn apply(&mut self, attempt: u64, event: TransferEvent) -> Option<String> {
        if attempt != self.attempt || self.state != UploadState::Uploading {
            debug!(file = %self.name, attempt, current = self.attempt, "Dropping stale event");
            return None;
        }

        match event {
            TransferEvent::Progress { sent, total } => {
                if let Some(pct) = percent(sent, total) {
                    if pct > self.progress {
                        self.progress = pct;
                    }
                }
                None
            }
            TransferEvent::Finished => {
                self.cancel = None;
                self.state = UploadState::Completed;
                self.progress = 100;
                info!(file = %self.name, "Upload completed");
                None
            }
            TransferEvent::Failed(message) => {
                self.cancel = None;
                self.state = UploadState::Paused;
                warn!(file = %self.name, error = %message, progress = self.progress, "Upload failed");
                self.last_error = Some(message.clone());
                Some(message)
            }
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

impl Drop for UploadTask {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
