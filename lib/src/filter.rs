use std::{
    error,
    str::FromStr,
    time::{
        Duration,
        SystemTime,
    },
};

use thiserror::Error;

use crate::EntryKind;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("the type filter must name at least one of f, d or l")]
    Empty,

    #[error("unknown entry type '{0}' (expected f, d or l)")]
    UnknownType(String),
}

/// Set of entry kinds an entry must belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    kinds: Vec<EntryKind>,
}

impl TypeFilter {
    pub fn new(kinds: impl IntoIterator<Item = EntryKind>) -> Self {
        let mut result = Self { kinds: Vec::new() };
        for kind in kinds {
            if !result.kinds.contains(&kind) {
                result.kinds.push(kind);
            }
        }
        result
    }

    pub fn files_and_directories() -> Self {
        Self::new([EntryKind::File, EntryKind::Directory])
    }

    pub fn matches(&self, kind: EntryKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> &[EntryKind] {
        &self.kinds
    }

    /// Value parser for the command line, e.g. `f,d`.
    pub fn parse_arg(value: &str) -> Result<Self, Box<dyn error::Error + Send + Sync>> {
        Ok(value.parse()?)
    }
}

impl Default for TypeFilter {
    fn default() -> Self {
        Self::files_and_directories()
    }
}

impl FromStr for TypeFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut kinds = Vec::new();
        for letter in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match EntryKind::from_letter(letter) {
                Some(kind) => kinds.push(kind),
                None => return Err(FilterParseError::UnknownType(letter.to_string())),
            }
        }

        if kinds.is_empty() {
            return Err(FilterParseError::Empty);
        }

        Ok(Self::new(kinds))
    }
}

/// Filter applied to every immediate child of the scanned root.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Entries must not have been modified for at least this many days.
    pub min_age_days: u64,
    pub types: TypeFilter,
}

impl ScanFilter {
    pub fn min_age(&self) -> Duration {
        Duration::from_secs(self.min_age_days.saturating_mul(SECONDS_PER_DAY))
    }

    /// Modification times in the future count as age zero.
    pub fn is_old_enough(&self, modified: SystemTime, now: SystemTime) -> bool {
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        age >= self.min_age()
    }

    pub fn matches(&self, kind: EntryKind, modified: SystemTime, now: SystemTime) -> bool {
        self.types.matches(kind) && self.is_old_enough(modified, now)
    }
}
