use super::file_processor::FileProcessor;
use super::task::UploadTask;
use super::types::{TransferUpdate, UploadState};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files selected for upload. Display names are unique within the list.
#[derive(Default)]
pub struct UploadList {
    tasks: Vec<UploadTask>,
    next_id: u64,
}

impl UploadList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds files not already listed under the same name. Returns how many were added.
    pub fn add_paths<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            let size = match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot read selected file");
                    continue;
                }
            };

            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if self.tasks.iter().any(|t| t.name == name) {
                debug!(file = %name, "Already in upload list");
                continue;
            }
            self.next_id += 1;
            self.tasks.push(UploadTask::new(self.next_id, path, size));
            added += 1;
        }
        added
    }

    pub fn add_folder(&mut self, folder: &Path, exclude_patterns: &[String]) -> usize {
        let files = FileProcessor::new(folder, exclude_patterns).collect_files();
        self.add_paths(files)
    }

    /// Removes a task; its in-flight request is aborted when the task drops.
    pub fn remove(&mut self, id: u64) -> Option<UploadTask> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn get(&self, id: u64) -> Option<&UploadTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut UploadTask> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn startable_ids(&self) -> Vec<u64> {
        self.tasks
            .iter()
            .filter(|t| t.is_startable())
            .map(|t| t.id)
            .collect()
    }

    /// Routes a worker update to its task. Updates for removed tasks are dropped.
    pub fn apply(&mut self, update: TransferUpdate) -> Option<String> {
        let task = self.get_mut(update.task_id)?;
        task.apply(update.attempt, update.event)
            .map(|message| format!("{}: {}", task.name, message))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn count_in(&self, state: UploadState) -> usize {
        self.tasks.iter().filter(|t| t.state() == state).count()
    }

    pub fn clear_completed(&mut self) {
        self.tasks.retain(|t| t.state() != UploadState::Completed);
    }

    pub fn get_status_text(&self) -> String {
        format!(
            "Files: {} | ⏳ Uploading: {} | ⏸ Paused: {} | ✅ Completed: {}",
            self.len(),
            self.count_in(UploadState::Uploading),
            self.count_in(UploadState::Paused),
            self.count_in(UploadState::Completed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::TransferEvent;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.txt");
        fs::write(&a, vec![0u8; 10]).unwrap();
        fs::write(&b, vec![0u8; 20]).unwrap();
        (dir, vec![a, b])
    }

    #[test]
    fn dedupes_by_name() {
        let (dir, paths) = fixture();
        let mut list = UploadList::new();
        assert_eq!(list.add_paths(paths.clone()), 2);
        assert_eq!(list.add_paths(paths), 0);

        fs::create_dir_all(dir.path().join("other")).unwrap();
        let same_name = dir.path().join("other/a.pdf");
        fs::write(&same_name, b"x").unwrap();
        assert_eq!(list.add_paths(vec![same_name]), 0);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rejected_duplicates_do_not_consume_ids() {
        let (dir, paths) = fixture();
        let mut list = UploadList::new();
        list.add_paths(paths.clone());
        list.add_paths(paths);

        let c = dir.path().join("c.docx");
        fs::write(&c, b"x").unwrap();
        list.add_paths(vec![c]);
        assert_eq!(list.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn skips_missing_files_and_directories() {
        let (dir, _) = fixture();
        let mut list = UploadList::new();
        let added = list.add_paths(vec![dir.path().join("nope.txt"), dir.path().to_path_buf()]);
        assert_eq!(added, 0);
        assert!(list.is_empty());
    }

    #[test]
    fn add_folder_uses_processor() {
        let (dir, _) = fixture();
        let mut list = UploadList::new();
        assert_eq!(list.add_folder(dir.path(), &["*.txt".to_string()]), 1);
        assert_eq!(list.iter().next().unwrap().name, "a.pdf");
    }

    #[test]
    fn remove_aborts_in_flight_attempt() {
        let (_dir, paths) = fixture();
        let mut list = UploadList::new();
        list.add_paths(paths);
        let id = list.ids()[0];
        let attempt = list.get_mut(id).unwrap().start().unwrap();

        assert!(list.remove(id).is_some());
        assert!(attempt.token.is_cancelled());
        assert!(list.get(id).is_none());

        let late = TransferUpdate {
            task_id: id,
            attempt: attempt.number,
            event: TransferEvent::Finished,
        };
        assert!(list.apply(late).is_none());
    }

    #[test]
    fn apply_prefixes_alert_with_file_name() {
        let (_dir, paths) = fixture();
        let mut list = UploadList::new();
        list.add_paths(paths);
        let id = list.ids()[1];
        let attempt = list.get_mut(id).unwrap().start().unwrap();

        let alert = list.apply(TransferUpdate {
            task_id: id,
            attempt: attempt.number,
            event: TransferEvent::Failed("Upload error: connection refused".to_string()),
        });
        assert_eq!(alert.as_deref(), Some("b.txt: Upload error: connection refused"));
        assert_eq!(list.count_in(UploadState::Paused), 1);
        assert_eq!(list.startable_ids().len(), 2);
    }
}
