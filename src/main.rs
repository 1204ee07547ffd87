use std::{
    io::{
        self,
        IsTerminal,
    },
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use durank::{
    remove::{
        DryRunRemover,
        FsRemover,
        Remover,
    },
    style::Palette,
    Cleanup,
    CleanupError,
};

use crate::{
    args::Args,
    term::TerminalPrompt,
};

mod args;
mod term;

/// Exit code of a completed run in which at least one removal failed.
/// Distinct from clap's usage error code 2.
const EXIT_REMOVAL_FAILED: u8 = 3;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    env_logger::init();

    let root_path = dunce::canonicalize(&args.path).map_err(|err| CleanupError::InvalidPath {
        path: args.path.clone(),
        reason: err.to_string(),
    })?;
    log::debug!("Root path: {}", root_path.display());

    let palette = if args.no_color || !io::stdout().is_terminal() {
        Palette::plain()
    } else {
        Palette::default()
    };

    let remover: Box<dyn Remover> = if args.check {
        Box::new(DryRunRemover)
    } else {
        Box::new(FsRemover)
    };

    let mut cleanup = Cleanup::new(
        args.cleanup_options(),
        remover,
        Box::new(TerminalPrompt::stdin(palette)),
    )
    .with_palette(palette);

    let summary = cleanup
        .run(&root_path, &mut io::stdout())
        .with_context(|| format!("Failed to clean up {}", root_path.display()))?;

    if !summary.removal_failures.is_empty() {
        eprintln!(
            "{} of {} entries could not be removed",
            summary.removal_failures.len(),
            summary.processed
        );
        return Ok(ExitCode::from(EXIT_REMOVAL_FAILED));
    }

    Ok(ExitCode::SUCCESS)
}
