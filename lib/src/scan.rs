use std::{
    fs,
    path::Path,
    time::SystemTime,
};

use crate::{
    Candidate,
    CleanupError,
    EntryKind,
    ScanFilter,
};

/// Verifies that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), CleanupError> {
    let meta = fs::metadata(root).map_err(|err| CleanupError::InvalidPath {
        path: root.to_owned(),
        reason: err.to_string(),
    })?;

    if !meta.is_dir() {
        return Err(CleanupError::InvalidPath {
            path: root.to_owned(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}

/// Lists the immediate children of `root` matching `filter`, in directory read order.
pub fn list_children(root: &Path, filter: &ScanFilter) -> Result<Vec<Candidate>, CleanupError> {
    validate_root(root)?;

    let read_dir = fs::read_dir(root).map_err(|source| CleanupError::Enumeration {
        path: root.to_owned(),
        source,
    })?;

    let now = SystemTime::now();
    let mut candidates = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| CleanupError::Enumeration {
            path: root.to_owned(),
            source,
        })?;
        let entry_path = entry.path();

        let kind = match entry.file_type() {
            Ok(file_type) => EntryKind::from_file_type(file_type),
            Err(err) => {
                log::warn!("Failed to inspect {}: {:#}", entry_path.display(), err);
                continue;
            }
        };
        let Some(kind) = kind else {
            log::trace!("Ignoring special file {}", entry_path.display());
            continue;
        };
        if !filter.types.matches(kind) {
            continue;
        }

        let modified = match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                log::warn!(
                    "Failed to read modification time of {}: {:#}",
                    entry_path.display(),
                    err
                );
                continue;
            }
        };
        if !filter.is_old_enough(modified, now) {
            log::trace!("{} is too young", entry_path.display());
            continue;
        }

        log::trace!("Found {} {}", kind, entry_path.display());
        candidates.push(Candidate {
            path: entry_path,
            kind,
        });
    }

    log::debug!("Found {} candidates in {}", candidates.len(), root.display());
    Ok(candidates)
}
