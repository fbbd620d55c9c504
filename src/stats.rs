use crate::models::{
    ActionRecord, CategoryBreakdown, DailyPoint, ImpactEquivalents, StatsSnapshot, TimelineEntry,
};
use chrono::{Duration, Local, NaiveDate};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_SERIES_DAYS: usize = 30;
pub const MAX_SERIES_DAYS: usize = 365;
pub const RECENT_ACTIVITY_LIMIT: usize = 5;
pub const DEFAULT_TIMELINE_LIMIT: usize = 10;

/// kg of CO2 an average tree absorbs in a year.
const KG_PER_TREE_YEAR: f64 = 21.77;
/// Miles driven per kg of CO2 emitted.
const MILES_PER_KG: f64 = 2.31;

pub fn build_snapshot(records: &[ActionRecord], days: usize) -> StatsSnapshot {
    build_snapshot_at(Local::now().date_naive(), records, days)
}

/// Recomputes every aggregate from the full record set. No state is kept
/// between calls.
pub fn build_snapshot_at(today: NaiveDate, records: &[ActionRecord], days: usize) -> StatsSnapshot {
    let total_co2_saved = total_co2(records);

    StatsSnapshot {
        total_actions: records.len() as u64,
        total_co2_saved,
        current_streak: current_streak(records, today),
        action_type_breakdown: category_breakdown(records),
        daily_series: daily_series(records, today, days),
        equivalents: impact_equivalents(total_co2_saved),
    }
}

pub fn total_co2(records: &[ActionRecord]) -> f64 {
    records.iter().map(|record| record.co2_saved).sum()
}

/// Consecutive days with activity, counting back from `today`. Nothing
/// logged today means no streak, even if yesterday was active.
pub fn current_streak(records: &[ActionRecord], today: NaiveDate) -> u32 {
    let active: HashSet<NaiveDate> = records.iter().map(|record| record.action_date).collect();

    let mut streak = 0u32;
    let mut day = today;
    while active.contains(&day) {
        streak = streak.saturating_add(1);
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Per-category count and CO2 sum, in the order categories first appear.
pub fn category_breakdown(records: &[ActionRecord]) -> Vec<CategoryBreakdown> {
    let mut breakdown: Vec<CategoryBreakdown> = Vec::new();
    for record in records {
        match breakdown.iter_mut().find(|entry| entry.category == record.category) {
            Some(entry) => {
                entry.count += 1;
                entry.co2_saved += record.co2_saved;
            }
            None => breakdown.push(CategoryBreakdown {
                category: record.category,
                count: 1,
                co2_saved: record.co2_saved,
            }),
        }
    }
    breakdown
}

/// Dense series of `days` entries ending at `today`, oldest first.
pub fn daily_series(records: &[ActionRecord], today: NaiveDate, days: usize) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, (f64, u64)> = HashMap::new();
    for record in records {
        let entry = by_day.entry(record.action_date).or_default();
        entry.0 += record.co2_saved;
        entry.1 += 1;
    }

    let mut series = Vec::with_capacity(days);
    for offset in (0..days).rev() {
        let date = today - Duration::days(offset as i64);
        let (co2_saved, actions) = by_day.get(&date).copied().unwrap_or_default();
        series.push(DailyPoint {
            date,
            label: day_label(date),
            co2_saved,
            actions,
        });
    }
    series
}

/// Most recent records first, ties broken by creation time.
pub fn timeline(records: &[ActionRecord], limit: usize) -> Vec<TimelineEntry> {
    let mut sorted: Vec<&ActionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.action_date
            .cmp(&a.action_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    sorted
        .into_iter()
        .take(limit)
        .map(|record| TimelineEntry {
            id: record.id,
            date: record.action_date,
            category: record.category,
            description: record.description.clone(),
            co2_saved: record.co2_saved,
            value: record.value,
        })
        .collect()
}

pub fn impact_equivalents(total_co2_saved: f64) -> ImpactEquivalents {
    ImpactEquivalents {
        trees: (total_co2_saved / KG_PER_TREE_YEAR).round() as u64,
        miles: (total_co2_saved * MILES_PER_KG).round() as u64,
    }
}

pub fn clamp_days(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_SERIES_DAYS)
        .clamp(1, MAX_SERIES_DAYS)
}

fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
