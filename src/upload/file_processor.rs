use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Collects the files of a folder for upload, honouring `.gitignore` and
/// the user's exclude globs (matched against the path relative to the folder).
pub struct FileProcessor {
    folder_path: PathBuf,
    excludes: Vec<Pattern>,
}

impl FileProcessor {
    pub fn new(folder_path: &Path, exclude_patterns: &[String]) -> Self {
        let excludes = exclude_patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %raw, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self {
            folder_path: folder_path.to_path_buf(),
            excludes,
        }
    }

    pub fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.folder_path).require_git(false).build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if self.is_excluded(path) {
                debug!(path = %path.display(), "Excluded by pattern");
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        debug!(folder = %self.folder_path.display(), count = files.len(), "Collected folder files");
        files
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.folder_path).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }
}
