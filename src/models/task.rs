//! Task tables, media subtypes and the checklist kinds derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// The physical tables task rows live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskTable {
    Offers,
    NonAvailableCommodities,
    OrganiserFeedback,
    StallInspections,
    NextDayPlanning,
    StallConfirmations,
    Media,
}

impl TaskTable {
    pub const ALL: [TaskTable; 7] = [
        TaskTable::Offers,
        TaskTable::NonAvailableCommodities,
        TaskTable::OrganiserFeedback,
        TaskTable::StallInspections,
        TaskTable::NextDayPlanning,
        TaskTable::StallConfirmations,
        TaskTable::Media,
    ];

    /// SQL table name. Only ever interpolated from this fixed set.
    pub fn table_name(&self) -> &'static str {
        match self {
            TaskTable::Offers => "offers",
            TaskTable::NonAvailableCommodities => "non_available_commodities",
            TaskTable::OrganiserFeedback => "organiser_feedback",
            TaskTable::StallInspections => "stall_inspections",
            TaskTable::NextDayPlanning => "next_day_planning",
            TaskTable::StallConfirmations => "stall_confirmations",
            TaskTable::Media => "media",
        }
    }
}

/// Discriminator of rows in the `media` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    OutsideRates,
    MarketVideo,
    CleaningVideo,
    Selfie,
}

impl MediaType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MediaType::OutsideRates => "outside_rates",
            MediaType::MarketVideo => "market_video",
            MediaType::CleaningVideo => "cleaning_video",
            MediaType::Selfie => "selfie",
        }
    }

    /// `rate_board` is the older name of `outside_rates`.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "outside_rates" | "rate_board" => Some(MediaType::OutsideRates),
            "market_video" => Some(MediaType::MarketVideo),
            "cleaning_video" => Some(MediaType::CleaningVideo),
            "selfie" | "attendance_selfie" => Some(MediaType::Selfie),
            _ => None,
        }
    }
}

/// How a task row is tied back to the session it counts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Row carries `session_id`.
    Session,
    /// Row carries `market_id + date + user_id`.
    Market,
}

/// One entry of a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Offers,
    NonAvailableCommodities,
    OrganiserFeedback,
    StallInspections,
    NextDayPlanning,
    StallConfirmations,
    OutsideRates,
    MarketVideo,
    CleaningVideo,
    AttendanceSelfie,
}

impl TaskKind {
    pub const ALL: [TaskKind; 10] = [
        TaskKind::Offers,
        TaskKind::NonAvailableCommodities,
        TaskKind::OrganiserFeedback,
        TaskKind::StallInspections,
        TaskKind::NextDayPlanning,
        TaskKind::StallConfirmations,
        TaskKind::OutsideRates,
        TaskKind::MarketVideo,
        TaskKind::CleaningVideo,
        TaskKind::AttendanceSelfie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Offers => "offers",
            TaskKind::NonAvailableCommodities => "non_available_commodities",
            TaskKind::OrganiserFeedback => "organiser_feedback",
            TaskKind::StallInspections => "stall_inspections",
            TaskKind::NextDayPlanning => "next_day_planning",
            TaskKind::StallConfirmations => "stall_confirmations",
            TaskKind::OutsideRates => "outside_rates",
            TaskKind::MarketVideo => "market_video",
            TaskKind::CleaningVideo => "cleaning_video",
            TaskKind::AttendanceSelfie => "attendance_selfie",
        }
    }

    /// Parse a kind from CLI input. Short aliases are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "offers" => Some(TaskKind::Offers),
            "non_available_commodities" | "commodities" => Some(TaskKind::NonAvailableCommodities),
            "organiser_feedback" | "feedback" => Some(TaskKind::OrganiserFeedback),
            "stall_inspections" | "inspections" => Some(TaskKind::StallInspections),
            "next_day_planning" | "planning" => Some(TaskKind::NextDayPlanning),
            "stall_confirmations" | "confirmations" => Some(TaskKind::StallConfirmations),
            "outside_rates" | "rate_board" => Some(TaskKind::OutsideRates),
            "market_video" => Some(TaskKind::MarketVideo),
            "cleaning_video" => Some(TaskKind::CleaningVideo),
            "attendance_selfie" | "selfie" => Some(TaskKind::AttendanceSelfie),
            _ => None,
        }
    }

    pub fn table(&self) -> TaskTable {
        match self {
            TaskKind::Offers => TaskTable::Offers,
            TaskKind::NonAvailableCommodities => TaskTable::NonAvailableCommodities,
            TaskKind::OrganiserFeedback => TaskTable::OrganiserFeedback,
            TaskKind::StallInspections => TaskTable::StallInspections,
            TaskKind::NextDayPlanning => TaskTable::NextDayPlanning,
            TaskKind::StallConfirmations => TaskTable::StallConfirmations,
            TaskKind::OutsideRates
            | TaskKind::MarketVideo
            | TaskKind::CleaningVideo
            | TaskKind::AttendanceSelfie => TaskTable::Media,
        }
    }

    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            TaskKind::OutsideRates => Some(MediaType::OutsideRates),
            TaskKind::MarketVideo => Some(MediaType::MarketVideo),
            TaskKind::CleaningVideo => Some(MediaType::CleaningVideo),
            TaskKind::AttendanceSelfie => Some(MediaType::Selfie),
            _ => None,
        }
    }

    pub fn scope(&self) -> TaskScope {
        match self {
            TaskKind::Offers
            | TaskKind::NonAvailableCommodities
            | TaskKind::OrganiserFeedback
            | TaskKind::NextDayPlanning
            | TaskKind::StallConfirmations => TaskScope::Market,
            _ => TaskScope::Session,
        }
    }

    /// Kind a stored row counts toward, if any.
    pub fn of_row(row: &TaskRow) -> Option<Self> {
        match row.table {
            TaskTable::Offers => Some(TaskKind::Offers),
            TaskTable::NonAvailableCommodities => Some(TaskKind::NonAvailableCommodities),
            TaskTable::OrganiserFeedback => Some(TaskKind::OrganiserFeedback),
            TaskTable::StallInspections => Some(TaskKind::StallInspections),
            TaskTable::NextDayPlanning => Some(TaskKind::NextDayPlanning),
            TaskTable::StallConfirmations => Some(TaskKind::StallConfirmations),
            TaskTable::Media => match row.media_type? {
                MediaType::OutsideRates => Some(TaskKind::OutsideRates),
                MediaType::MarketVideo => Some(TaskKind::MarketVideo),
                MediaType::CleaningVideo => Some(TaskKind::CleaningVideo),
                MediaType::Selfie => Some(TaskKind::AttendanceSelfie),
            },
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed list of task kinds every session of a view is judged against.
#[derive(Debug, Clone, Copy)]
pub struct Checklist {
    pub kinds: &'static [TaskKind],
}

impl Checklist {
    /// Nine-task checklist of the employee attendance dashboard.
    pub const EMPLOYEE_DAY: Checklist = Checklist {
        kinds: &[
            TaskKind::Offers,
            TaskKind::NonAvailableCommodities,
            TaskKind::OrganiserFeedback,
            TaskKind::StallInspections,
            TaskKind::NextDayPlanning,
            TaskKind::StallConfirmations,
            TaskKind::OutsideRates,
            TaskKind::MarketVideo,
            TaskKind::CleaningVideo,
        ],
    };

    /// Eight required tasks of the admin "All Sessions" review.
    pub const SESSION_REVIEW: Checklist = Checklist {
        kinds: &[
            TaskKind::Offers,
            TaskKind::NonAvailableCommodities,
            TaskKind::OrganiserFeedback,
            TaskKind::StallInspections,
            TaskKind::NextDayPlanning,
            TaskKind::AttendanceSelfie,
            TaskKind::MarketVideo,
            TaskKind::CleaningVideo,
        ],
    };

    pub fn total(&self) -> usize {
        self.kinds.len()
    }
}

/// A row of any task table, reduced to the columns the engine needs.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub table: TaskTable,
    pub id: i64,
    pub session_id: Option<i64>,
    pub market_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub media_type: Option<MediaType>, // only for `media`; None when unknown
    pub stall_no: Option<i64>,         // only for `stall_confirmations`
    pub created_at: DateTime<Utc>,
    pub captured_at: Option<DateTime<Utc>>, // only for `media`
}

impl TaskRow {
    /// Activity timestamp used for "last upload": capture time for media,
    /// creation time otherwise.
    pub fn activity_time(&self) -> DateTime<Utc> {
        self.captured_at.unwrap_or(self.created_at)
    }
}
