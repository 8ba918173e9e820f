use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::task::TaskKind;

/// Per-market activity for one business date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub market_id: i64,
    pub market_name: String,
    pub active_employees: usize,
    pub stall_confirmations_count: usize,
    pub media_uploads_count: usize,
    pub last_upload_time: Option<DateTime<Utc>>,
    pub task_stats: BTreeMap<TaskKind, usize>,
}

impl MarketSummary {
    pub fn empty(market_id: i64, market_name: impl Into<String>) -> Self {
        Self {
            market_id,
            market_name: market_name.into(),
            active_employees: 0,
            stall_confirmations_count: 0,
            media_uploads_count: 0,
            last_upload_time: None,
            task_stats: BTreeMap::new(),
        }
    }
}
