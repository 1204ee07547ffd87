use std::{
    fs,
    io,
    path::Path,
};

/// Removes a confirmed entry. Only ever called after the removal gate allowed it.
pub trait Remover {
    fn name(&self) -> &str;

    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Recursive, forced removal (`rm -rf`). Symlinks are removed, never followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = fs::symlink_metadata(path)?;
        if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Leaves the filesystem untouched and only logs what would have been removed.
/// Wired in check mode as a second guard: the removal gate already refuses every
/// removal in check mode, so this is never the primary protection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRemover;

impl Remover for DryRunRemover {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        log::info!("Dry run, not removing {}", path.display());
        Ok(())
    }
}
