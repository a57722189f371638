//! Directory ↔ corpus synchronization.

use omniverse_core::FileCorpus;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// The default ignore pattern: hidden files and directories anywhere in the
/// tree.
pub const DEFAULT_IGNORE: &str = r"^.*[\\/]\..*|^\..*";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("base directory '{path}' does not exist")]
    MissingBaseDir { path: String },

    #[error("base directory '{path}' seems to be a file")]
    BaseDirIsFile { path: String },

    #[error("invalid ignore pattern '{pattern}': {message}")]
    InvalidIgnorePattern { pattern: String, message: String },

    #[error("failed reading '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed writing '{path}': {message}")]
    Write { path: String, message: String },

    #[error("failed deleting '{path}': {message}")]
    Delete { path: String, message: String },
}

/// Reads and writes one directory tree as a [`FileCorpus`].
///
/// Corpus keys are `/`-separated paths relative to the base directory. Files
/// whose relative path matches the ignore pattern are invisible in both
/// directions: they are neither read nor ever deleted by a write-back.
pub struct Syncer {
    basedir: PathBuf,
    ignore: Regex,
}

impl Syncer {
    pub fn new(basedir: impl AsRef<Path>, ignore: &str) -> Result<Self, SyncError> {
        let basedir = basedir.as_ref();
        match fs::metadata(basedir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(SyncError::BaseDirIsFile {
                    path: basedir.display().to_string(),
                });
            }
            Err(_) => {
                return Err(SyncError::MissingBaseDir {
                    path: basedir.display().to_string(),
                });
            }
        }

        let ignore = Regex::new(ignore).map_err(|err| SyncError::InvalidIgnorePattern {
            pattern: ignore.to_string(),
            message: err.to_string(),
        })?;

        Ok(Self {
            basedir: basedir.to_path_buf(),
            ignore,
        })
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    pub fn is_ignored(&self, relative: &str) -> bool {
        self.ignore.is_match(relative)
    }

    /// Read the whole tree into a corpus, skipping ignored files.
    pub fn read_files(&self) -> Result<FileCorpus, SyncError> {
        let mut out = FileCorpus::new();
        for relative in self.list_files()? {
            let path = self.basedir.join(&relative);
            let data = fs::read(&path).map_err(|err| SyncError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            out.insert(relative, data);
        }
        Ok(out)
    }

    /// Write a corpus back into the tree, creating parent directories as
    /// needed. With `delete_obsolete`, files on disk that the corpus does not
    /// contain are removed first (ignored files excepted).
    pub fn write_files(&self, files: &FileCorpus, delete_obsolete: bool) -> Result<(), SyncError> {
        if delete_obsolete {
            let obsolete: Vec<String> = self
                .list_files()?
                .into_iter()
                .filter(|path| !files.contains_key(path))
                .collect();
            for relative in obsolete {
                let path = self.basedir.join(&relative);
                tracing::info!(file = %relative, "deleting obsolete file");
                fs::remove_file(&path).map_err(|err| SyncError::Delete {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
            }
        }

        for (relative, data) in files {
            if self.is_ignored(relative) {
                continue;
            }
            let path = self.basedir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| SyncError::Write {
                    path: parent.display().to_string(),
                    message: err.to_string(),
                })?;
            }
            tracing::debug!(file = %relative, bytes = data.len(), "writing file");
            fs::write(&path, data).map_err(|err| SyncError::Write {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        }
        Ok(())
    }

    /// Relative paths of all non-ignored files currently in the tree.
    pub fn list_files(&self) -> Result<BTreeSet<String>, SyncError> {
        let mut out = BTreeSet::new();
        self.visit(&self.basedir, &mut out)?;
        Ok(out)
    }

    fn visit(&self, dir: &Path, out: &mut BTreeSet<String>) -> Result<(), SyncError> {
        let entries = fs::read_dir(dir).map_err(|err| SyncError::Read {
            path: dir.display().to_string(),
            message: err.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|err| SyncError::Read {
                path: dir.display().to_string(),
                message: err.to_string(),
            })?;
            let path = entry.path();
            let relative = self.relative(&path);
            if path.is_dir() {
                // The ignore pattern is matched per file path, so descend
                // even into directories that would match it themselves.
                self.visit(&path, out)?;
            } else if !self.is_ignored(&relative) {
                out.insert(relative);
            }
        }
        Ok(())
    }

    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.basedir).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "omniverse-sync-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("temp dir should be created");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn write(base: &Path, relative: &str, data: &str) {
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs should be created");
        }
        fs::write(path, data).expect("file should be written");
    }

    #[test]
    fn read_write_roundtrip() {
        let dir = TempDirGuard::new("roundtrip");
        write(dir.path(), "a.md", "alpha");
        write(dir.path(), "sub/b.md", "beta");

        let syncer = Syncer::new(dir.path(), DEFAULT_IGNORE).expect("dir exists");
        let corpus = syncer.read_files().expect("read should succeed");
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus["a.md"], b"alpha");
        assert_eq!(corpus["sub/b.md"], b"beta");

        let out = TempDirGuard::new("roundtrip-out");
        let writer = Syncer::new(out.path(), DEFAULT_IGNORE).expect("dir exists");
        writer
            .write_files(&corpus, false)
            .expect("write should succeed");
        let reread = writer.read_files().expect("read should succeed");
        assert_eq!(reread, corpus);
    }

    #[test]
    fn hidden_files_are_ignored() {
        let dir = TempDirGuard::new("ignore");
        write(dir.path(), ".hidden", "secret");
        write(dir.path(), ".git/config", "secret");
        write(dir.path(), "visible.md", "content");

        let syncer = Syncer::new(dir.path(), DEFAULT_IGNORE).expect("dir exists");
        let corpus = syncer.read_files().expect("read should succeed");
        assert_eq!(corpus.keys().collect::<Vec<_>>(), vec!["visible.md"]);
    }

    #[test]
    fn write_deletes_obsolete_files_but_never_ignored_ones() {
        let dir = TempDirGuard::new("obsolete");
        write(dir.path(), "keep.md", "old");
        write(dir.path(), "drop.md", "old");
        write(dir.path(), ".hidden", "untouchable");

        let syncer = Syncer::new(dir.path(), DEFAULT_IGNORE).expect("dir exists");
        let corpus: FileCorpus = [("keep.md".to_string(), b"new".to_vec())].into_iter().collect();
        syncer
            .write_files(&corpus, true)
            .expect("write should succeed");

        assert_eq!(fs::read(dir.path().join("keep.md")).unwrap(), b"new");
        assert!(!dir.path().join("drop.md").exists());
        assert!(dir.path().join(".hidden").exists());
    }

    #[test]
    fn missing_basedir_is_an_error() {
        let dir = TempDirGuard::new("missing");
        let missing = dir.path().join("nope");
        assert!(matches!(
            Syncer::new(&missing, DEFAULT_IGNORE),
            Err(SyncError::MissingBaseDir { .. })
        ));
    }

    #[test]
    fn file_as_basedir_is_an_error() {
        let dir = TempDirGuard::new("file-base");
        write(dir.path(), "file.md", "content");
        assert!(matches!(
            Syncer::new(dir.path().join("file.md"), DEFAULT_IGNORE),
            Err(SyncError::BaseDirIsFile { .. })
        ));
    }
}
