use super::task::{percent, Attempt};
use super::types::{TransferEvent, TransferUpdate};
use crate::api::FilesClient;
use crate::error::ClientError;
use crate::session::Session;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Called after every event so the UI can repaint.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct UploadJob {
    pub task_id: u64,
    pub attempt: Attempt,
    pub path: PathBuf,
    pub file_name: String,
    pub size_label: String,
}

pub fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Status { status, .. } => {
            format!("Upload failed (status {})", status.as_u16())
        }
        other => format!("Upload error: {}", other),
    }
}

/// Runs one upload attempt. Progress is reported once per whole percent;
/// exactly one `Finished`/`Failed` follows unless the attempt is cancelled,
/// in which case the request is dropped and nothing more is sent.
pub async fn run_upload(
    files: FilesClient,
    session: Session,
    job: UploadJob,
    sender: Sender<TransferUpdate>,
    notify: Notify,
) {
    let task_id = job.task_id;
    let attempt = job.attempt.number;

    let progress_sender = sender.clone();
    let progress_notify = notify.clone();
    let mut last_percent = None;
    let on_progress = move |sent: u64, total: u64| {
        let pct = percent(sent, total);
        if pct.is_none() || pct == last_percent {
            return;
        }
        last_percent = pct;
        let _ = progress_sender.send(TransferUpdate {
            task_id,
            attempt,
            event: TransferEvent::Progress { sent, total },
        });
        progress_notify();
    };

    let upload = files.upload(
        Some(&session),
        &job.path,
        &job.file_name,
        &job.size_label,
        on_progress,
    );

    let event = tokio::select! {
        biased;
        _ = job.attempt.token.cancelled() => {
            info!(file = %job.file_name, attempt, "Upload request aborted");
            return;
        }
        result = upload => match result {
            Ok(()) => TransferEvent::Finished,
            Err(e) => {
                error!(file = %job.file_name, attempt, error = %e, "Upload request failed");
                TransferEvent::Failed(failure_message(&e))
            }
        }
    };

    let _ = sender.send(TransferUpdate {
        task_id,
        attempt,
        event,
    });
    notify();
}

/// Spawns upload attempts on the application's runtime.
#[derive(Clone)]
pub struct TransferWorker {
    files: FilesClient,
    runtime: Handle,
    sender: Sender<TransferUpdate>,
    notify: Notify,
}

impl TransferWorker {
    pub fn new(
        files: FilesClient,
        runtime: Handle,
        sender: Sender<TransferUpdate>,
        notify: Notify,
    ) -> Self {
        Self {
            files,
            runtime,
            sender,
            notify,
        }
    }

    pub fn spawn(&self, job: UploadJob, session: Session) -> JoinHandle<()> {
        self.runtime.spawn(run_upload(
            self.files.clone(),
            session,
            job,
            self.sender.clone(),
            self.notify.clone(),
        ))
    }
}
