//! Status transitions.
//!
//! Which status a report may move to is decided by a [`TransitionTable`]:
//! a map from the current status to the set of statuses it may move to.
//! Re-setting the current status is always permitted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::report::ReportStatus;

/// Named transition tables selectable from configuration.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
  /// Any status may move to any other, including backwards
  /// (e.g. `RESOLVED` → `PENDING`).
  #[default]
  Unrestricted,
  /// Statuses only move forward; `RESOLVED` and `DISMISSED` are terminal.
  ForwardOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
  allowed: HashMap<ReportStatus, HashSet<ReportStatus>>,
}

impl TransitionTable {
  /// Every status may move to every other.
  pub fn unrestricted() -> Self {
    Self::from_pairs(ReportStatus::ALL.into_iter().flat_map(|from| {
      ReportStatus::ALL.into_iter().map(move |to| (from, to))
    }))
  }

  /// `PENDING` → `IN_PROGRESS | RESOLVED | DISMISSED`,
  /// `IN_PROGRESS` → `RESOLVED | DISMISSED`; nothing leaves a terminal state.
  pub fn forward_only() -> Self {
    use ReportStatus::*;
    Self::from_pairs([
      (Pending, InProgress),
      (Pending, Resolved),
      (Pending, Dismissed),
      (InProgress, Resolved),
      (InProgress, Dismissed),
    ])
  }

  /// Build a table from explicit `(from, to)` pairs.
  pub fn from_pairs(
    pairs: impl IntoIterator<Item = (ReportStatus, ReportStatus)>,
  ) -> Self {
    let mut allowed: HashMap<ReportStatus, HashSet<ReportStatus>> =
      HashMap::new();
    for (from, to) in pairs {
      allowed.entry(from).or_default().insert(to);
    }
    Self { allowed }
  }

  pub fn allows(&self, from: ReportStatus, to: ReportStatus) -> bool {
    from == to || self.allowed.get(&from).is_some_and(|next| next.contains(&to))
  }

  /// Statuses reachable from `from` in one step, in declaration order.
  pub fn next_statuses(&self, from: ReportStatus) -> Vec<ReportStatus> {
    ReportStatus::ALL
      .into_iter()
      .filter(|to| *to != from && self.allows(from, *to))
      .collect()
  }
}

impl Default for TransitionTable {
  fn default() -> Self { Self::unrestricted() }
}

impl From<TransitionPolicy> for TransitionTable {
  fn from(policy: TransitionPolicy) -> Self {
    match policy {
      TransitionPolicy::Unrestricted => Self::unrestricted(),
      TransitionPolicy::ForwardOnly => Self::forward_only(),
    }
  }
}
