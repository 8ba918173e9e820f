use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Stored lifecycle status of an employee market session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Finalized,
    Locked,
}

impl SessionStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Finalized => "finalized",
            SessionStatus::Locked => "locked",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            "finalized" => Some(SessionStatus::Finalized),
            "locked" => Some(SessionStatus::Locked),
            _ => None,
        }
    }

    /// Finalized and locked sessions reject every further write.
    pub fn is_frozen(&self) -> bool {
        matches!(self, SessionStatus::Finalized | SessionStatus::Locked)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,                           // ⇔ sessions.user_id
    pub market_id: i64,                         // ⇔ sessions.market_id
    pub session_date: NaiveDate,                // ⇔ sessions.session_date (IST business date)
    pub punch_in_time: Option<DateTime<Utc>>,   // ⇔ sessions.punch_in_time (RFC 3339)
    pub punch_out_time: Option<DateTime<Utc>>,  // ⇔ sessions.punch_out_time (RFC 3339)
    pub status: SessionStatus,                  // ⇔ sessions.status
}

impl Session {
    pub fn is_punched_out(&self) -> bool {
        self.punch_out_time.is_some()
    }
}

/// Which kind of manager keeps a time-based session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerRole {
    Bdo,
    MarketManager,
}

impl ManagerRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ManagerRole::Bdo => "bdo",
            ManagerRole::MarketManager => "market_manager",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bdo" => Some(ManagerRole::Bdo),
            "market_manager" | "manager" => Some(ManagerRole::MarketManager),
            _ => None,
        }
    }
}

/// BDO / market-manager session, judged on elapsed hours instead of tasks.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerSession {
    pub id: i64,
    pub user_id: i64,
    pub role: ManagerRole,
    pub session_date: NaiveDate,
    pub punch_in_time: Option<DateTime<Utc>>,
    pub punch_out_time: Option<DateTime<Utc>>,
}
