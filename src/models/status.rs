use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use super::session::SessionStatus;

/// Day status of an ordinary employee, judged on tasks done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Active,
    HalfDay,
    Completed,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Active => "active",
            DayStatus::HalfDay => "half_day",
            DayStatus::Completed => "completed",
        }
    }
}

/// Day status of a BDO or market manager, judged on elapsed hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerDayStatus {
    /// Not punched out yet: pending, not classified.
    Active,
    FullDay,
    HalfDay,
    Absent,
}

impl ManagerDayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerDayStatus::Active => "active",
            ManagerDayStatus::FullDay => "full_day",
            ManagerDayStatus::HalfDay => "half_day",
            ManagerDayStatus::Absent => "absent",
        }
    }
}

/// A display badge of the admin sessions view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Completed,
    Expired,
    Incomplete,
    Finalized,
    Locked,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Completed => "completed",
            StatusLabel::Expired => "expired",
            StatusLabel::Incomplete => "incomplete",
            StatusLabel::Finalized => "finalized",
            StatusLabel::Locked => "locked",
        }
    }
}

/// Non-empty set of display labels for one session.
///
/// Only constructible through [`StatusSet::single`] and [`StatusSet::pair`],
/// so it can never be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet(BTreeSet<StatusLabel>);

impl StatusSet {
    pub fn single(label: StatusLabel) -> Self {
        Self(BTreeSet::from([label]))
    }

    pub fn pair(a: StatusLabel, b: StatusLabel) -> Self {
        Self(BTreeSet::from([a, b]))
    }

    /// The stored status a frozen session displays verbatim.
    pub fn frozen(status: SessionStatus) -> Option<Self> {
        match status {
            SessionStatus::Finalized => Some(Self::single(StatusLabel::Finalized)),
            SessionStatus::Locked => Some(Self::single(StatusLabel::Locked)),
            _ => None,
        }
    }

    pub fn contains(&self, label: StatusLabel) -> bool {
        self.0.contains(&label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusLabel> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.iter().map(|l| l.as_str()).collect();
        f.write_str(&labels.join(","))
    }
}

impl Serialize for StatusSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}
