use time::OffsetDateTime;

use crate::meals::repo::ResolvedFood;

pub const WINDOW_DAYS: usize = 7;

/// Occurrence count per canonical food description, descending by count.
/// Matching is plain string equality; near-duplicate descriptions stay
/// separate. Ties keep first-appearance order (the sort is stable).
pub fn top_foods<'a, I>(food_lists: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a [ResolvedFood]>,
{
    let mut counts: Vec<(String, u64)> = Vec::new();
    for foods in food_lists {
        for item in foods {
            match counts.iter_mut().find(|(name, _)| *name == item.food) {
                Some((_, n)) => *n += 1,
                None => counts.push((item.food.clone(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Calorie totals for the last seven calendar days, oldest bucket first
/// (index 6 is today). Day boundaries are midnight in the offset of `now`;
/// records outside the window are excluded entirely.
pub fn weekly_calories(records: &[(i64, f64)], now: OffsetDateTime) -> [f64; WINDOW_DAYS] {
    let today = now.date().to_julian_day();
    let mut buckets = [0.0; WINDOW_DAYS];

    for &(ts_ms, calories) in records {
        let Ok(ts) = OffsetDateTime::from_unix_timestamp_nanos(ts_ms as i128 * 1_000_000) else {
            continue;
        };
        let days_ago = today - ts.to_offset(now.offset()).date().to_julian_day();
        if (0..WINDOW_DAYS as i32).contains(&days_ago) {
            buckets[WINDOW_DAYS - 1 - days_ago as usize] += calories;
        }
    }
    buckets
}
