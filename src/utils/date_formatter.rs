use chrono::{DateTime, Datelike, Months, TimeZone, Utc};

const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
/// 1970-01-04 was the first Sunday after the epoch.
const FIRST_SUNDAY_MS: f64 = 3.0 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickInterval {
    Hours(u32),
    Days(u32),
    Week,
    Months(u32),
}

impl TickInterval {
    const LADDER: [TickInterval; 11] = [
        TickInterval::Hours(1),
        TickInterval::Hours(3),
        TickInterval::Hours(6),
        TickInterval::Hours(12),
        TickInterval::Days(1),
        TickInterval::Days(2),
        TickInterval::Week,
        TickInterval::Months(1),
        TickInterval::Months(3),
        TickInterval::Months(6),
        TickInterval::Months(12),
    ];

    /// Nominal length in milliseconds (months count as 30 days).
    pub fn approx_ms(&self) -> f64 {
        match self {
            Self::Hours(n) => *n as f64 * HOUR_MS,
            Self::Days(n) => *n as f64 * DAY_MS,
            Self::Week => WEEK_MS,
            Self::Months(n) => *n as f64 * 30.0 * DAY_MS,
        }
    }

    /// Smallest interval that yields at most `count` ticks over `span_ms`.
    pub fn for_span(span_ms: f64, count: usize) -> Self {
        let target = span_ms / count.max(1) as f64;
        Self::LADDER
            .iter()
            .copied()
            .find(|i| i.approx_ms() >= target)
            .unwrap_or(Self::Months(12))
    }
}

/// Calendar-aligned UTC ticks within `[min_ms, max_ms]`.
pub fn time_ticks(min_ms: f64, max_ms: f64, count: usize) -> Vec<f64> {
    if !min_ms.is_finite() || !max_ms.is_finite() || max_ms < min_ms {
        return vec![];
    }
    match TickInterval::for_span(max_ms - min_ms, count) {
        TickInterval::Hours(n) => fixed_step_ticks(min_ms, max_ms, 0.0, n as f64 * HOUR_MS),
        TickInterval::Days(n) => fixed_step_ticks(min_ms, max_ms, 0.0, n as f64 * DAY_MS),
        TickInterval::Week => fixed_step_ticks(min_ms, max_ms, FIRST_SUNDAY_MS, WEEK_MS),
        TickInterval::Months(n) => month_ticks(min_ms, max_ms, n),
    }
}

fn fixed_step_ticks(min_ms: f64, max_ms: f64, anchor: f64, step: f64) -> Vec<f64> {
    let first = ((min_ms - anchor) / step).ceil() * step + anchor;
    let mut ticks = vec![];
    let mut t = first;
    while t <= max_ms {
        ticks.push(t);
        t += step;
    }
    ticks
}

fn month_ticks(min_ms: f64, max_ms: f64, step: u32) -> Vec<f64> {
    let Some(start) = to_datetime(min_ms) else {
        return vec![];
    };
    let month0 = start.month0() / step * step;
    let Some(mut cursor) = Utc
        .with_ymd_and_hms(start.year(), month0 + 1, 1, 0, 0, 0)
        .single()
    else {
        return vec![];
    };
    let mut ticks = vec![];
    loop {
        let t = cursor.timestamp_millis() as f64;
        if t > max_ms {
            break;
        }
        if t >= min_ms {
            ticks.push(t);
        }
        match cursor.checked_add_months(Months::new(step)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    ticks
}

fn to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms as i64).single()
}

/// Full month name and space-padded day, e.g. `"June  5"`.
pub fn format_month_day(ms: f64) -> String {
    match to_datetime(ms) {
        Some(dt) => dt.format("%B %e").to_string(),
        None => format!("{:.0}", ms),
    }
}

/// Fixed-point with no decimals.
pub fn format_fixed(value: f64) -> String {
    format!("{:.0}", value)
}
