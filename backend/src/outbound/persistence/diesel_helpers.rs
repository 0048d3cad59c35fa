//! Batch loaders shared by the post and comment repositories.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::{GroupSummary, UserSummary};

use super::diesel_error_mapping::LoadError;
use super::models::{AuthorRow, GroupRow};
use super::schema::{groups, users};

/// Load author summaries for every distinct id in `ids`.
pub(crate) async fn load_authors(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, LoadError> {
    let ids: Vec<Uuid> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<AuthorRow> = users::table
        .filter(users::id.eq_any(ids))
        .select(AuthorRow::as_select())
        .load(conn)
        .await?;
    rows.into_iter()
        .map(|row| Ok((row.id, row.into_summary().map_err(LoadError::Corrupt)?)))
        .collect()
}

/// Load group summaries for every distinct id in `ids`.
pub(crate) async fn load_groups(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, GroupSummary>, LoadError> {
    let ids: Vec<i32> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<GroupRow> = groups::table
        .filter(groups::id.eq_any(ids))
        .select(GroupRow::as_select())
        .load(conn)
        .await?;
    rows.into_iter()
        .map(|row| {
            let group = row.into_group().map_err(LoadError::Corrupt)?;
            Ok((group.id.get(), group.summary()))
        })
        .collect()
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Half-open UTC bounds of `day`.
pub(crate) fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = day
        .succ_opt()
        .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc());
    (start, end)
}
