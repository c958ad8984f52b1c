mod file_processor;
mod list;
mod task;
mod transfer;
mod types;

pub use list::UploadList;
pub use task::UploadTask;
pub use transfer::{Notify, TransferWorker, UploadJob};
pub use types::{TransferUpdate, UploadState};
