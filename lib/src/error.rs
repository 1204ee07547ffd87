use std::{
    io,
    path::PathBuf,
};

use thiserror::Error;

/// Errors which abort a cleanup run.
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("failed to list {}: {source}", .path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read confirmation: {0}")]
    Confirmation(#[source] io::Error),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// An enumerated entry which could not be measured, e.g. because it vanished.
#[derive(Debug)]
pub struct MeasurementSkip {
    pub path: PathBuf,
    pub error: io::Error,
}

/// A confirmed removal which did not succeed.
#[derive(Debug)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: io::Error,
}
