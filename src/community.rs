use crate::models::{ActionRecord, CommunityImpact, LeaderboardEntry};
use std::collections::BTreeMap;

/// Ranks users by total CO2 saved, highest first. Ties keep `user_id` order.
pub fn rank_users(records: &[ActionRecord]) -> Vec<LeaderboardEntry> {
    let mut by_user: BTreeMap<&str, LeaderboardEntry> = BTreeMap::new();
    for record in records {
        let entry = by_user
            .entry(record.user_id.as_str())
            .or_insert_with(|| LeaderboardEntry {
                user_id: record.user_id.clone(),
                total_co2_saved: 0.0,
                action_count: 0,
            });
        entry.total_co2_saved += record.co2_saved;
        entry.action_count += 1;
    }

    let mut ranked: Vec<LeaderboardEntry> = by_user
        .into_values()
        .filter(|entry| entry.action_count > 0)
        .collect();
    ranked.sort_by(|a, b| b.total_co2_saved.total_cmp(&a.total_co2_saved));
    ranked
}

/// Where `user_id` stands in a leaderboard already sorted by total, highest first.
/// Users without actions are dropped before ranking.
pub fn community_impact(leaderboard: &[LeaderboardEntry], user_id: &str) -> CommunityImpact {
    let ranked: Vec<&LeaderboardEntry> = leaderboard
        .iter()
        .filter(|entry| entry.action_count > 0)
        .collect();

    let total_users = ranked.len();
    let total_co2_saved: f64 = ranked.iter().map(|entry| entry.total_co2_saved).sum();
    let total_actions: u64 = ranked.iter().map(|entry| entry.action_count).sum();

    let position = ranked.iter().position(|entry| entry.user_id == user_id);
    let user_rank = position.map_or(total_users + 1, |index| index + 1);
    let user_total = position.map_or(0.0, |index| ranked[index].total_co2_saved);

    CommunityImpact {
        total_users,
        total_co2_saved,
        total_actions,
        user_rank,
        user_percentile: percentile(user_rank, total_users),
        user_share_percent: share_percent(user_total, total_co2_saved),
    }
}

/// `round((total - rank + 1) / total * 100)`, or 0 for an empty board.
pub fn percentile(rank: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let standing = total as f64 - rank as f64 + 1.0;
    (standing / total as f64 * 100.0).round().max(0.0) as u32
}

fn share_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}
