use std::path::PathBuf;

use clap::Parser;
use durank::{
    fs::SizeMode,
    CleanupOptions,
    ScanFilter,
    TypeFilter,
};

/// List the entries of a directory ordered by disk usage and optionally remove the largest ones.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory to scan.
    /// Note: This can be a relative path.
    #[arg(verbatim_doc_comment)]
    pub path: PathBuf,

    /// Number of entries to present.
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: u64,

    /// Minimum amount of days an entry has not been modified.
    #[arg(short, long, default_value_t = 0)]
    pub days: u64,

    /// Entry types to consider, comma separated.
    ///
    /// Available types:
    /// - f: regular file
    /// - d: directory
    /// - l: symbolic link
    #[arg(
        short = 't',
        long,
        default_value = "f,d",
        value_parser = TypeFilter::parse_arg,
        verbatim_doc_comment
    )]
    pub filetype: TypeFilter,

    /// Do not show entry details, only the path.
    #[arg(short, long)]
    pub brief: bool,

    /// Run without removing anything.
    #[arg(short, long)]
    pub check: bool,

    /// Do not prompt before removal.
    #[arg(short, long)]
    pub force: bool,

    /// Measure allocated disk blocks instead of the apparent size.
    #[arg(long)]
    pub allocated: bool,

    /// Do not colorize the output.
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn cleanup_options(&self) -> CleanupOptions {
        CleanupOptions {
            limit: usize::try_from(self.limit).unwrap_or(usize::MAX),
            filter: ScanFilter {
                min_age_days: self.days,
                types: self.filetype.clone(),
            },
            size_mode: if self.allocated {
                SizeMode::Allocated
            } else {
                SizeMode::Apparent
            },
            brief: self.brief,
            check: self.check,
            force: self.force,
        }
    }
}
