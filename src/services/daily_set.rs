use chrono::NaiveDate;
use rand::Rng;

use crate::models::FigureEntry;
use crate::utils::sample_distinct;

/// Sample the day's working set: `min(size, pool.len())` distinct figures,
/// uniformly at random. The pool itself is never reordered.
pub fn select_daily_set<R: Rng + ?Sized>(
    pool: &[FigureEntry],
    size: usize,
    rng: &mut R,
) -> Vec<FigureEntry> {
    sample_distinct(pool, size, rng)
}

/// Compare at calendar-day granularity only
pub fn has_day_changed(last: NaiveDate, now: NaiveDate) -> bool {
    last != now
}
