use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{SuppressionDocument, parse_suppressions};
use crate::error::SuppressionError;

pub const SUPPRESSION_FILE_NAME: &str = "suppressions.yaml";

/// Finds the suppression file closest to a spec config.
///
/// Looks in the config's folder and then each parent, stopping at
/// `spec_repo`. `spec_config_path` is relative to `spec_repo` and may name a
/// file or a folder.
#[must_use]
pub fn find_suppression_file(spec_repo: &Path, spec_config_path: &str) -> Option<PathBuf> {
    let config = spec_repo.join(spec_config_path);
    let mut dir = if config.is_dir() {
        Some(config.as_path())
    } else {
        config.parent()
    };

    while let Some(current) = dir {
        if !current.starts_with(spec_repo) {
            break;
        }
        let candidate = current.join(SUPPRESSION_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if current == spec_repo {
            break;
        }
        dir = current.parent();
    }
    None
}

/// Loads the suppression document that applies to a spec config, if any.
///
/// # Errors
///
/// Returns an error if a suppression file exists but cannot be read or parsed.
pub fn load_suppressions(
    spec_repo: &Path,
    spec_config_path: &str,
) -> crate::Result<Option<(PathBuf, SuppressionDocument)>> {
    let Some(path) = find_suppression_file(spec_repo, spec_config_path) else {
        tracing::debug!(spec_config_path, "no suppression file found");
        return Ok(None);
    };
    let content = fs::read_to_string(&path).map_err(|source| SuppressionError::Read {
        path: path.clone(),
        source,
    })?;
    let document = parse_suppressions(&content).map_err(|source| SuppressionError::Invalid {
        path: path.clone(),
        source: Box::new(source),
    })?;
    tracing::info!(path = %path.display(), "loaded breaking change suppressions");
    Ok(Some((path, document)))
}
