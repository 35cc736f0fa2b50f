use serde::{Deserialize, Serialize};

pub const DEFAULT_TREND_WINDOW: usize = 5;

/// One gameweek from a manager's season history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(rename = "event")]
    pub period: u32,
    pub points: i32,
}

/// Latest gameweek that has scored points. Unplayed or blank weeks (0 points) are skipped.
pub fn current_period(history: &[PeriodRecord]) -> Option<u32> {
    history
        .iter()
        .filter(|r| r.points > 0)
        .map(|r| r.period)
        .max()
}

/// The last `window` scoring gameweeks, oldest first.
pub fn points_trend(history: &[PeriodRecord], window: usize) -> Vec<PeriodRecord> {
    let mut scored: Vec<PeriodRecord> = history.iter().copied().filter(|r| r.points > 0).collect();
    scored.sort_by_key(|r| r.period);
    let skip = scored.len().saturating_sub(window);
    scored.split_off(skip)
}
