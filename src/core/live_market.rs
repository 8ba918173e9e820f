use crate::core::calculator::aggregator::{ActiveRule, MarketDay, aggregate_markets};
use crate::core::logic::Core;
use crate::db::pool::DbPool;
use crate::db::queries::{list_markets, lookup_market_names};
use crate::errors::{AppError, AppResult};
use crate::models::market_summary::MarketSummary;
use chrono::NaiveDate;

/// Live market monitoring.
pub struct LiveMarketLogic;

impl LiveMarketLogic {
    /// Summaries of `market_ids` (all markets when empty) on `date`, in the
    /// order requested.
    pub fn summaries(
        pool: &mut DbPool,
        market_ids: &[i64],
        date: NaiveDate,
        rule: ActiveRule,
    ) -> AppResult<Vec<MarketSummary>> {
        let markets: Vec<(i64, String)> = if market_ids.is_empty() {
            list_markets(&pool.conn)?
        } else {
            let names = lookup_market_names(&pool.conn, market_ids)?;
            let mut out = Vec::with_capacity(market_ids.len());
            for id in market_ids {
                if out.iter().any(|(seen, _)| seen == id) {
                    continue;
                }
                let name = names.get(id).cloned().ok_or(AppError::UnknownId {
                    entity: "market",
                    id: *id,
                })?;
                out.push((*id, name));
            }
            out
        };

        let ids: Vec<i64> = markets.iter().map(|(id, _)| *id).collect();
        let batch = Core::load_day(&pool.conn, &ids, &date)?;
        let day = MarketDay::new(date, &batch.sessions, &batch.rows);

        Ok(aggregate_markets(&markets, &day, rule))
    }
}
