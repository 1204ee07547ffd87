use std::{
    io,
    path::Path,
    process::Command,
};

use crate::Entry;

/// Produces the human readable type description shown next to an entry.
pub trait Describe {
    fn describe(&self, entry: &Entry) -> String;
}

/// Sniffs the content with `file -b`. Falls back to the entry kind if the command is unavailable.
#[derive(Debug, Clone)]
pub struct FileCommandDescriber {
    program: String,
}

impl FileCommandDescriber {
    pub fn new() -> Self {
        Self::with_program("file")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn sniff(&self, path: &Path) -> io::Result<String> {
        let output = Command::new(&self.program).arg("-b").arg(path).output()?;
        if !output.status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with {}", self.program, output.status),
            ));
        }

        let description = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if description.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} returned no description", self.program),
            ));
        }

        Ok(description)
    }
}

impl Default for FileCommandDescriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for FileCommandDescriber {
    fn describe(&self, entry: &Entry) -> String {
        match self.sniff(&entry.path) {
            Ok(description) => description,
            Err(err) => {
                log::warn!(
                    "Failed to describe {} using {}: {:#}",
                    entry.path.display(),
                    self.program,
                    err
                );
                entry.kind.description().to_string()
            }
        }
    }
}

/// Describes entries by their kind only.
#[derive(Debug, Clone, Copy, Default)]
pub struct KindDescriber;

impl Describe for KindDescriber {
    fn describe(&self, entry: &Entry) -> String {
        entry.kind.description().to_string()
    }
}
