use std::path::{Path, PathBuf};

use sdkgen_config::Pattern;

use crate::Result;

/// File access for the working folder, the temp folder and the SDK repository.
pub trait WorkspaceIo: Send + Sync {
    /// Returns `None` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// Writes `content`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be written.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Removing a file that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the target written.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn is_dir(&self, path: &Path) -> bool;

    /// Recursively lists files under `roots` whose file name matches `pattern`.
    ///
    /// Roots that do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be traversed.
    fn find_files(&self, roots: &[PathBuf], pattern: &Pattern) -> Result<Vec<PathBuf>>;
}
