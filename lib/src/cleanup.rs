use std::{
    collections::VecDeque,
    io::{
        self,
        Write,
    },
    path::Path,
};

use crate::{
    decision::{
        Notice,
        RemovalGate,
    },
    describe::{
        Describe,
        FileCommandDescriber,
    },
    fs::{
        collect_sizes,
        SizeMode,
    },
    remove::Remover,
    scan,
    style::Palette,
    utils::format_file_size,
    Candidate,
    CleanupError,
    Entry,
    MeasurementSkip,
    RankedList,
    RemovalFailure,
    ScanFilter,
};

pub struct CleanupOptions {
    /// Maximum number of entries presented. Scanning and ranking always cover every match.
    pub limit: usize,
    pub filter: ScanFilter,
    pub size_mode: SizeMode,

    /// Only print the path of each entry.
    pub brief: bool,

    /// Never remove anything.
    pub check: bool,

    /// Do not ask before removing.
    pub force: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            filter: ScanFilter::default(),
            size_mode: SizeMode::default(),
            brief: false,
            check: false,
            force: false,
        }
    }
}

/// Source of the operator's yes/no answer for an entry.
pub trait ConfirmationProvider {
    fn confirm(&mut self, entry: &Entry) -> io::Result<bool>;
}

/// Replays a fixed list of answers and declines once it runs out.
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<bool>,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl ConfirmationProvider for ScriptedAnswers {
    fn confirm(&mut self, _entry: &Entry) -> io::Result<bool> {
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

/// Counters of a single run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries which matched the filter and could be measured.
    pub matched: usize,
    pub skipped: Vec<MeasurementSkip>,

    /// Entries within the limit which have been presented.
    pub processed: usize,
    /// Combined size of every presented entry, removed or not.
    pub candidate_bytes: u64,

    pub removed: usize,
    pub removed_bytes: u64,
    pub removal_failures: Vec<RemovalFailure>,
}

/// The scan, rank, confirm and remove pipeline for one root directory.
pub struct Cleanup {
    options: CleanupOptions,
    palette: Palette,
    describer: Box<dyn Describe>,
    remover: Box<dyn Remover>,
    confirmation: Box<dyn ConfirmationProvider>,
}

impl Cleanup {
    pub fn new(
        options: CleanupOptions,
        remover: Box<dyn Remover>,
        confirmation: Box<dyn ConfirmationProvider>,
    ) -> Self {
        Self {
            options,
            palette: Palette::default(),
            describer: Box::new(FileCommandDescriber::new()),
            remover,
            confirmation,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_describer(mut self, describer: Box<dyn Describe>) -> Self {
        self.describer = describer;
        self
    }

    pub fn run(&mut self, root: &Path, out: &mut dyn Write) -> Result<RunSummary, CleanupError> {
        let candidates = scan::list_children(root, &self.options.filter)?;
        self.process(root, candidates, out)
    }

    /// Measures, ranks and handles already enumerated candidates of `root`.
    fn process(
        &mut self,
        root: &Path,
        candidates: Vec<Candidate>,
        out: &mut dyn Write,
    ) -> Result<RunSummary, CleanupError> {
        let measurements = collect_sizes(candidates, self.options.size_mode);
        let ranked = RankedList::new(measurements.entries);
        log::debug!(
            "Ranked {} entries in {} ({} skipped)",
            ranked.len(),
            root.display(),
            measurements.skipped.len()
        );

        let mut summary = RunSummary {
            matched: ranked.len(),
            skipped: measurements.skipped,
            ..Default::default()
        };

        if ranked.is_empty() {
            writeln!(out, "No matching entries in {}\n", root.display())?;
            self.write_totals(&summary, out)?;
            return Ok(summary);
        }

        writeln!(out, "Files in {}: {}", root.display(), ranked.len())?;
        writeln!(out, "Result limit is: {}\n", self.options.limit)?;

        let gate = RemovalGate::new(self.options.force, self.options.check);
        for entry in ranked.top(self.options.limit) {
            if let Err(error) = self.handle_entry(entry, gate, &mut summary, out) {
                if matches!(error, CleanupError::Confirmation(_)) {
                    // entries handled so far may already be gone
                    self.write_totals(&summary, out)?;
                }
                return Err(error);
            }
        }

        self.write_totals(&summary, out)?;
        Ok(summary)
    }

    fn present(&self, entry: &Entry, out: &mut dyn Write) -> io::Result<()> {
        if self.options.brief {
            return writeln!(out, "{}", entry.path.display());
        }

        writeln!(
            out,
            "file: {}\ntype: {}\nsize: {}\n",
            entry.path.display(),
            self.describer.describe(entry),
            format_file_size(entry.size)
        )
    }

    fn handle_entry(
        &mut self,
        entry: &Entry,
        gate: RemovalGate,
        summary: &mut RunSummary,
        out: &mut dyn Write,
    ) -> Result<(), CleanupError> {
        self.present(entry, out)?;

        let answer = if gate.requires_prompt() {
            out.flush()?;
            let answer = self
                .confirmation
                .confirm(entry)
                .map_err(CleanupError::Confirmation)?;
            Some(answer)
        } else {
            None
        };

        let verdict = gate.decide(answer);
        summary.processed += 1;
        summary.candidate_bytes = summary.candidate_bytes.saturating_add(entry.size);

        if verdict.remove {
            log::debug!(
                "Removing {} using {}",
                entry.path.display(),
                self.remover.name()
            );
            if let Err(error) = self.remover.remove(&entry.path) {
                log::warn!("Failed to remove {}: {:#}", entry.path.display(), error);
                writeln!(
                    out,
                    "{}\n",
                    self.palette
                        .warning(&format!("Failed to remove {}: {}", entry.path.display(), error))
                )?;
                summary.removal_failures.push(RemovalFailure {
                    path: entry.path.clone(),
                    error,
                });
                return Ok(());
            }

            summary.removed += 1;
            summary.removed_bytes = summary.removed_bytes.saturating_add(entry.size);
        }

        let notice = match verdict.notice {
            Notice::Removed => self.palette.notice("Removed!"),
            Notice::CheckMode => self.palette.notice("Not removed! (check mode)"),
            Notice::Skipping => self.palette.skipped("Skipping"),
        };
        writeln!(out, "{}\n", notice)?;
        Ok(())
    }

    fn write_totals(&self, summary: &RunSummary, out: &mut dyn Write) -> io::Result<()> {
        if !summary.skipped.is_empty() {
            writeln!(
                out,
                "{}",
                self.palette.warning(&format!(
                    "Skipped {} entries which could not be measured",
                    summary.skipped.len()
                ))
            )?;
        }

        writeln!(
            out,
            "Total candidates: {}",
            format_file_size(summary.candidate_bytes)
        )?;
        writeln!(
            out,
            "Total removed: {}",
            format_file_size(summary.removed_bytes)
        )?;
        out.flush()
    }
}

#[cfg(test)]
mod test {
    use std::{
        cell::{
            Cell,
            RefCell,
        },
        fs,
        io,
        path::{
            Path,
            PathBuf,
        },
        rc::Rc,
    };

    use super::{
        Cleanup,
        CleanupOptions,
        ConfirmationProvider,
        ScriptedAnswers,
    };
    use crate::{
        describe::KindDescriber,
        scan,
        remove::{
            FsRemover,
            Remover,
        },
        style::Palette,
        CleanupError,
        Entry,
    };

    #[derive(Default, Clone)]
    struct RecordingRemover {
        removed: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl Remover for RecordingRemover {
        fn name(&self) -> &str {
            "recording"
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            self.removed.borrow_mut().push(path.to_owned());
            Ok(())
        }
    }

    struct FailingRemover;

    impl Remover for FailingRemover {
        fn name(&self) -> &str {
            "failing"
        }

        fn remove(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
        }
    }

    #[derive(Clone)]
    struct CountingAnswers {
        asked: Rc<Cell<usize>>,
        answer: bool,
    }

    impl ConfirmationProvider for CountingAnswers {
        fn confirm(&mut self, _entry: &Entry) -> io::Result<bool> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.answer)
        }
    }

    /// Directories `a`, `b` and `c` holding 500k, 200k and 100k of data.
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, size) in [("c", 100_000), ("a", 500_000), ("b", 200_000)] {
            fs::create_dir(dir.path().join(name)).unwrap();
            fs::write(dir.path().join(name).join("payload.bin"), vec![0u8; size]).unwrap();
        }
        dir
    }

    fn cleanup(
        options: CleanupOptions,
        remover: Box<dyn Remover>,
        confirmation: Box<dyn ConfirmationProvider>,
    ) -> Cleanup {
        Cleanup::new(options, remover, confirmation)
            .with_palette(Palette::plain())
            .with_describer(Box::new(KindDescriber))
    }

    fn run(cleanup: &mut Cleanup, root: &Path) -> (super::RunSummary, String) {
        let mut out = Vec::new();
        let summary = cleanup.run(root, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn forced_run_removes_the_largest_entries_within_limit() {
        let dir = fixture();
        let remover = RecordingRemover::default();
        let mut cleanup = cleanup(
            CleanupOptions {
                limit: 2,
                force: true,
                ..Default::default()
            },
            Box::new(remover.clone()),
            Box::new(ScriptedAnswers::default()),
        );

        let (summary, output) = run(&mut cleanup, dir.path());

        assert_eq!(
            *remover.removed.borrow(),
            [dir.path().join("a"), dir.path().join("b")]
        );
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.removed_bytes, summary.candidate_bytes);
        assert!(summary.candidate_bytes >= 700_000);

        let a = output.find(&dir.path().join("a").display().to_string()).unwrap();
        let b = output.find(&dir.path().join("b").display().to_string()).unwrap();
        assert!(a < b);
        assert!(!output.contains(&dir.path().join("c").display().to_string()));
        assert!(output.contains("Files in"));
        assert!(output.contains(": 3\nResult limit is: 2\n"));
        assert!(output.contains("type: directory"));
    }

    #[test]
    fn forced_check_mode_only_reports() {
        let dir = fixture();
        let remover = RecordingRemover::default();
        let mut cleanup = cleanup(
            CleanupOptions {
                limit: 2,
                force: true,
                check: true,
                ..Default::default()
            },
            Box::new(remover.clone()),
            Box::new(ScriptedAnswers::default()),
        );

        let (summary, output) = run(&mut cleanup, dir.path());

        assert!(remover.removed.borrow().is_empty());
        assert_eq!(output.matches("Not removed! (check mode)").count(), 2);
        assert_eq!(summary.removed_bytes, 0);
        assert!(summary.candidate_bytes >= 700_000);
        assert!(output.contains("Total removed: 0B"));
    }

    #[test]
    fn interactive_answers_decide_each_entry() {
        let dir = fixture();
        let remover = RecordingRemover::default();
        let mut cleanup = cleanup(
            CleanupOptions::default(),
            Box::new(remover.clone()),
            Box::new(ScriptedAnswers::new([true, false, true])),
        );

        let (summary, output) = run(&mut cleanup, dir.path());

        assert_eq!(
            *remover.removed.borrow(),
            [dir.path().join("a"), dir.path().join("c")]
        );
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.removed, 2);
        assert_eq!(output.matches("Removed!").count(), 2);
        assert_eq!(output.matches("Skipping").count(), 1);
        assert!(summary.candidate_bytes > summary.removed_bytes);
    }

    #[test]
    fn check_mode_prompts_but_never_removes() {
        let dir = fixture();
        let asked = Rc::new(Cell::new(0));
        let mut cleanup = cleanup(
            CleanupOptions {
                check: true,
                ..Default::default()
            },
            Box::new(FsRemover),
            Box::new(CountingAnswers {
                asked: asked.clone(),
                answer: true,
            }),
        );

        let (summary, _) = run(&mut cleanup, dir.path());

        assert_eq!(asked.get(), 3);
        assert_eq!(summary.removed, 0);
        for name in ["a", "b", "c"] {
            assert!(dir.path().join(name).is_dir());
        }
    }

    #[test]
    fn forced_run_never_prompts() {
        let dir = fixture();
        let asked = Rc::new(Cell::new(0));
        let mut cleanup = cleanup(
            CleanupOptions {
                force: true,
                ..Default::default()
            },
            Box::new(FsRemover),
            Box::new(CountingAnswers {
                asked: asked.clone(),
                answer: false,
            }),
        );

        let (summary, _) = run(&mut cleanup, dir.path());

        assert_eq!(asked.get(), 0);
        assert_eq!(summary.removed, 3);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_directory_reports_zero_results() {
        let dir = tempfile::tempdir().unwrap();
        let asked = Rc::new(Cell::new(0));
        let mut cleanup = cleanup(
            CleanupOptions::default(),
            Box::new(RecordingRemover::default()),
            Box::new(CountingAnswers {
                asked: asked.clone(),
                answer: true,
            }),
        );

        let (summary, output) = run(&mut cleanup, dir.path());

        assert_eq!(asked.get(), 0);
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.candidate_bytes, 0);
        assert!(output.contains("No matching entries"));
        assert!(output.contains("Total candidates: 0B"));
        assert!(output.contains("Total removed: 0B"));
    }

    #[test]
    fn removal_failures_do_not_stop_the_run() {
        let dir = fixture();
        let mut cleanup = cleanup(
            CleanupOptions {
                force: true,
                ..Default::default()
            },
            Box::new(FailingRemover),
            Box::new(ScriptedAnswers::default()),
        );

        let (summary, output) = run(&mut cleanup, dir.path());

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.removal_failures.len(), 3);
        assert_eq!(summary.removed_bytes, 0);
        assert!(summary.candidate_bytes >= 800_000);
        assert_eq!(output.matches("Failed to remove").count(), 3);
        assert!(output.contains("Total removed: 0B"));
    }

    #[test]
    fn brief_mode_prints_paths_only() {
        let dir = fixture();
        let mut cleanup = cleanup(
            CleanupOptions {
                brief: true,
                limit: 1,
                ..Default::default()
            },
            Box::new(RecordingRemover::default()),
            Box::new(ScriptedAnswers::default()),
        );

        let (_, output) = run(&mut cleanup, dir.path());

        assert!(output.contains(&format!("{}\n", dir.path().join("a").display())));
        assert!(!output.contains("type:"));
        assert!(!output.contains("size:"));
    }

    struct FailingAnswers {
        asked: usize,
    }

    impl ConfirmationProvider for FailingAnswers {
        fn confirm(&mut self, _entry: &Entry) -> io::Result<bool> {
            self.asked += 1;
            if self.asked > 1 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"));
            }
            Ok(true)
        }
    }

    #[test]
    fn confirmation_failure_still_prints_totals() {
        let dir = fixture();
        let remover = RecordingRemover::default();
        let mut cleanup = cleanup(
            CleanupOptions::default(),
            Box::new(remover.clone()),
            Box::new(FailingAnswers { asked: 0 }),
        );

        let mut out = Vec::new();
        let result = cleanup.run(dir.path(), &mut out);
        let output = String::from_utf8(out).unwrap();

        assert!(matches!(result, Err(CleanupError::Confirmation(_))));
        assert_eq!(*remover.removed.borrow(), [dir.path().join("a")]);
        assert_eq!(output.matches("Removed!").count(), 1);
        assert!(output.contains("Total candidates: "));
        assert!(output.contains("Total removed: "));
        assert!(!output.contains("Total removed: 0B"));
        assert!(!output.contains(&dir.path().join("c").display().to_string()));
    }

    #[test]
    fn vanished_entries_are_reported_and_not_ranked() {
        let dir = fixture();
        let candidates =
            scan::list_children(dir.path(), &CleanupOptions::default().filter).unwrap();
        assert_eq!(candidates.len(), 3);
        fs::remove_dir_all(dir.path().join("b")).unwrap();

        let remover = RecordingRemover::default();
        let mut cleanup = cleanup(
            CleanupOptions {
                force: true,
                brief: true,
                ..Default::default()
            },
            Box::new(remover.clone()),
            Box::new(ScriptedAnswers::default()),
        );

        let mut out = Vec::new();
        let summary = cleanup.process(dir.path(), candidates, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(summary.matched, 2);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].path, dir.path().join("b"));
        assert_eq!(
            *remover.removed.borrow(),
            [dir.path().join("a"), dir.path().join("c")]
        );
        assert!(!output.contains(&format!("{}\n", dir.path().join("b").display())));
        assert!(output.contains("Skipped 1 entries which could not be measured"));
    }

    #[test]
    fn invalid_root_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut cleanup = cleanup(
            CleanupOptions::default(),
            Box::new(RecordingRemover::default()),
            Box::new(ScriptedAnswers::default()),
        );

        let result = cleanup.run(&dir.path().join("missing"), &mut Vec::<u8>::new());
        assert!(matches!(result, Err(CleanupError::InvalidPath { .. })));
    }
}
