use crate::community::rank_users;
use crate::errors::AppError;
use crate::models::{ActionRecord, AppData, LeaderboardEntry, PendingAction};
use chrono::Utc;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;
use uuid::Uuid;

pub fn resolve_data_path() -> PathBuf {
    env::var("APP_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/eco_actions.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!(path = %path.display(), "failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!(path = %path.display(), "failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// All of a user's records, newest `action_date` first.
pub fn list_actions(data: &AppData, user_id: &str) -> Vec<ActionRecord> {
    let mut actions: Vec<ActionRecord> = data
        .actions
        .iter()
        .filter(|action| action.user_id == user_id)
        .cloned()
        .collect();
    actions.sort_by(|a, b| {
        b.action_date
            .cmp(&a.action_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    actions
}

/// Stores a validated action with its already-estimated `co2_saved`.
pub fn insert_action(
    data: &mut AppData,
    user_id: &str,
    pending: PendingAction,
    co2_saved: f64,
) -> ActionRecord {
    let record = ActionRecord {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        category: pending.category,
        description: pending.description,
        value: pending.value,
        co2_saved: co2_saved.max(0.0),
        action_date: pending.action_date,
        created_at: Utc::now(),
    };
    data.actions.push(record.clone());
    record
}

pub fn leaderboard(data: &AppData) -> Vec<LeaderboardEntry> {
    rank_users(&data.actions)
}
