use std::{
    collections::HashSet,
    fs::{
        self,
        DirEntry,
        Metadata,
    },
    io,
    path::Path,
};

use crate::{
    Candidate,
    Entry,
    MeasurementSkip,
};

/// How the size of an entry is accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Apparent size in bytes (`du -b`).
    #[default]
    Apparent,
    /// Allocated disk blocks (`du`, in bytes).
    Allocated,
}

impl SizeMode {
    fn size_of(self, meta: &Metadata) -> u64 {
        match self {
            Self::Apparent => meta.len(),
            Self::Allocated => allocated_size(meta),
        }
    }
}

#[cfg(unix)]
fn allocated_size(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.blocks().saturating_mul(512)
}

#[cfg(not(unix))]
fn allocated_size(meta: &Metadata) -> u64 {
    meta.len()
}

#[cfg(unix)]
fn shared_inode(meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    (meta.nlink() > 1).then(|| (meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn shared_inode(_meta: &Metadata) -> Option<(u64, u64)> {
    None
}

pub(crate) struct DirWalker {
    pending_entries: Vec<DirEntry>,
}

impl DirWalker {
    pub fn new() -> Self {
        Self {
            pending_entries: Vec::with_capacity(1024),
        }
    }

    pub fn next_item(&mut self) -> Option<DirEntry> {
        self.pending_entries.pop()
    }

    pub fn insert_entries(&mut self, path: &Path) -> io::Result<()> {
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Failed to read entry in {}: {:#}", path.display(), err);
                    continue;
                }
            };

            self.pending_entries.push(entry);
        }

        Ok(())
    }
}

/// Total usage of `path` and everything beneath it.
/// Symlinks are not followed and hard linked inodes are only counted once.
/// Unreadable subdirectories are skipped, only a missing `path` itself is an error.
pub fn disk_usage(path: &Path, mode: SizeMode) -> io::Result<u64> {
    let root_meta = fs::symlink_metadata(path)?;
    let mut seen_inodes = HashSet::new();
    if let Some(inode) = shared_inode(&root_meta) {
        seen_inodes.insert(inode);
    }

    let mut size_total = mode.size_of(&root_meta);
    if !root_meta.is_dir() {
        return Ok(size_total);
    }

    let mut walker = DirWalker::new();
    if let Err(err) = walker.insert_entries(path) {
        log::warn!("Failed to read directory {}: {:#}", path.display(), err);
    }

    while let Some(entry) = walker.next_item() {
        // DirEntry::metadata does not traverse symlinks
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                log::warn!("Failed to stat {}: {:#}", entry.path().display(), err);
                continue;
            }
        };

        if let Some(inode) = shared_inode(&meta) {
            if !seen_inodes.insert(inode) {
                continue;
            }
        }

        size_total = size_total.saturating_add(mode.size_of(&meta));
        if meta.is_dir() {
            let entry_path = entry.path();
            if let Err(err) = walker.insert_entries(&entry_path) {
                log::warn!("Failed to read directory {}: {:#}", entry_path.display(), err);
            }
        }
    }

    Ok(size_total)
}

/// Result of measuring all enumerated candidates.
#[derive(Debug, Default)]
pub struct Measurements {
    pub entries: Vec<Entry>,
    pub skipped: Vec<MeasurementSkip>,
}

/// Measures every candidate. Candidates which can no longer be read are skipped, not fatal.
pub fn collect_sizes(candidates: Vec<Candidate>, mode: SizeMode) -> Measurements {
    let mut result = Measurements::default();
    for candidate in candidates {
        match disk_usage(&candidate.path, mode) {
            Ok(size) => {
                log::trace!("Measured {} at {} bytes", candidate.path.display(), size);
                result.entries.push(Entry {
                    path: candidate.path,
                    kind: candidate.kind,
                    size,
                });
            }
            Err(error) => {
                log::warn!(
                    "Skipping {}, it could not be measured: {:#}",
                    candidate.path.display(),
                    error
                );
                result.skipped.push(MeasurementSkip {
                    path: candidate.path,
                    error,
                });
            }
        }
    }

    result
}
