//! Label transition table.
//!
//! Given which CLA labels a PR carries and whether it passes the gate,
//! [`plan`] returns the mutations that bring it to exactly one correct label.
//! The table is evaluated top to bottom and the first matching row wins:
//!
//! | yes | no  | ready | actions                               |
//! |-----|-----|-------|---------------------------------------|
//! | ✓   | any | ✓     | none                                  |
//! | any | ✓   | ✗     | none                                  |
//! | any | ✓   | ✓     | remove `no`, add `yes`                |
//! | any | any | ✓     | add `yes`                             |
//! | ✓   | any | ✗     | remove `yes`, comment, add `no`       |
//! | any | any | ✗     | comment, add `no`                     |

use serde::{Deserialize, Serialize};

use crate::config::ClaConfig;
use crate::github::Label;

/// One of the two managed labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaLabel {
    Yes,
    No,
}

impl ClaLabel {
    /// Label text under `config`'s prefix.
    #[must_use]
    pub fn name(self, config: &ClaConfig) -> String {
        match self {
            Self::Yes => config.yes_label(),
            Self::No => config.no_label(),
        }
    }
}

/// Which managed labels a PR currently carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelState {
    pub has_yes: bool,
    pub has_no: bool,
}

impl LabelState {
    #[must_use]
    pub const fn new(has_yes: bool, has_no: bool) -> Self {
        Self { has_yes, has_no }
    }

    /// Scan `labels` for the exact managed label names.
    #[must_use]
    pub fn from_labels(labels: &[Label], config: &ClaConfig) -> Self {
        let yes = config.yes_label();
        let no = config.no_label();

        labels.iter().fold(Self::default(), |state, label| Self {
            has_yes: state.has_yes || label.name == yes,
            has_no: state.has_no || label.name == no,
        })
    }

    /// Apply a plan's label mutations.
    #[must_use]
    pub fn apply(self, plan: &Plan) -> Self {
        plan.actions.iter().fold(self, |state, action| match action {
            LabelAction::Add(ClaLabel::Yes) => Self { has_yes: true, ..state },
            LabelAction::Add(ClaLabel::No) => Self { has_no: true, ..state },
            LabelAction::Remove(ClaLabel::Yes) => Self { has_yes: false, ..state },
            LabelAction::Remove(ClaLabel::No) => Self { has_no: false, ..state },
            LabelAction::PostNotSignedComment => state,
        })
    }
}

/// A single mutation against the PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "label", rename_all = "snake_case")]
pub enum LabelAction {
    Add(ClaLabel),
    Remove(ClaLabel),
    PostNotSignedComment,
}

/// Mutations in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<LabelAction>,
}

impl Plan {
    fn of(actions: &[LabelAction]) -> Self {
        Self {
            actions: actions.to_vec(),
        }
    }

    /// The PR already carries the correct label.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of label additions and removals.
    #[must_use]
    pub fn label_mutations(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| !matches!(a, LabelAction::PostNotSignedComment))
            .count()
    }

    /// Whether the plan posts the CLA comment.
    #[must_use]
    pub fn posts_comment(&self) -> bool {
        self.actions.contains(&LabelAction::PostNotSignedComment)
    }
}

/// Compute the mutations for `state` given the gate decision.
#[must_use]
pub fn plan(state: LabelState, ready: bool) -> Plan {
    use LabelAction::{Add, PostNotSignedComment, Remove};

    match (state.has_yes, state.has_no, ready) {
        (true, _, true) | (_, true, false) => Plan::default(),
        (_, true, true) => Plan::of(&[Remove(ClaLabel::No), Add(ClaLabel::Yes)]),
        (_, _, true) => Plan::of(&[Add(ClaLabel::Yes)]),
        (true, _, false) => Plan::of(&[
            Remove(ClaLabel::Yes),
            PostNotSignedComment,
            Add(ClaLabel::No),
        ]),
        (false, false, false) => Plan::of(&[PostNotSignedComment, Add(ClaLabel::No)]),
    }
}
