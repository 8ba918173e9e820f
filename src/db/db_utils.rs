//! Helpers for batched `IN (...)` queries.

use rusqlite::types::Type;
use std::collections::BTreeSet;

/// Ids bound per statement. SQLite's default limit is 999 parameters and
/// the queries add a couple of their own.
pub const MAX_IDS_PER_QUERY: usize = 900;

/// `?, ?, ?` for `n` parameters.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Deduplicated, sorted copy of `ids`, split into bindable chunks.
pub fn id_chunks(ids: &[i64]) -> Vec<Vec<i64>> {
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    unique
        .chunks(MAX_IDS_PER_QUERY)
        .map(|c| c.to_vec())
        .collect()
}

/// Wrap a parse failure of a stored TEXT column as a rusqlite conversion error.
pub fn conversion_error<E>(col: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}
