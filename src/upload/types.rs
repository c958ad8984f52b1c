#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Paused,
    Completed,
}

impl UploadState {
    pub fn label(self) -> &'static str {
        match self {
            UploadState::Idle => "Ready",
            UploadState::Uploading => "Uploading",
            UploadState::Paused => "Paused",
            UploadState::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    Progress { sent: u64, total: u64 },
    Finished,
    Failed(String),
}

/// A transfer event tagged with the task and attempt it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferUpdate {
    pub task_id: u64,
    pub attempt: u64,
    pub event: TransferEvent,
}
