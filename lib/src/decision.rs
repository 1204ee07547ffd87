/// What the operator is told after an entry has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Removed,
    /// The entry would have been removed but check mode is active.
    CheckMode,
    Skipping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub remove: bool,
    pub notice: Notice,
}

/// Decides whether a presented entry gets removed.
///
/// | force | answer | check | remove | notice    |
/// |-------|--------|-------|--------|-----------|
/// | yes   | -      | no    | yes    | Removed   |
/// | yes   | -      | yes   | no     | CheckMode |
/// | no    | yes    | no    | yes    | Removed   |
/// | no    | yes    | yes   | no     | CheckMode |
/// | no    | no     | any   | no     | Skipping  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemovalGate {
    pub force: bool,
    pub check: bool,
}

impl RemovalGate {
    pub fn new(force: bool, check: bool) -> Self {
        Self { force, check }
    }

    /// The operator is only asked when removal is not forced.
    pub fn requires_prompt(&self) -> bool {
        !self.force
    }

    /// `answer` is the operator's reply, `None` if no prompt was shown.
    pub fn decide(&self, answer: Option<bool>) -> Verdict {
        let active = self.force || answer == Some(true);
        match (active, self.check) {
            (true, false) => Verdict {
                remove: true,
                notice: Notice::Removed,
            },
            (true, true) => Verdict {
                remove: false,
                notice: Notice::CheckMode,
            },
            (false, _) => Verdict {
                remove: false,
                notice: Notice::Skipping,
            },
        }
    }
}
