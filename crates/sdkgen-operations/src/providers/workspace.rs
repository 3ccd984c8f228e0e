use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sdkgen_config::Pattern;
use walkdir::WalkDir;

use crate::Result;
use crate::error::OperationError;
use crate::traits::WorkspaceIo;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemWorkspace;

impl FileSystemWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WorkspaceIo for FileSystemWorkspace {
    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(OperationError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        fs::write(path, content).map_err(|source| OperationError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OperationError::Remove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|source| OperationError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|source| OperationError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn find_files(&self, roots: &[PathBuf], pattern: &Pattern) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for root in roots {
            if !root.exists() {
                tracing::debug!(root = %root.display(), "artifact search root does not exist");
                continue;
            }
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry.map_err(|source| OperationError::ArtifactSearch {
                    path: root.clone(),
                    source,
                })?;
                if entry.file_type().is_file()
                    && pattern.is_match(&entry.file_name().to_string_lossy())
                {
                    found.push(entry.into_path());
                }
            }
        }
        Ok(found)
    }
}
