use crate::errors::AppError;
use crate::models::{AppData, Challenge, ChallengeParticipant, ChallengeView, NewChallenge};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use uuid::Uuid;

pub fn create_challenge(data: &mut AppData, new: NewChallenge) -> Result<Challenge, AppError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("challenge name must not be empty"));
    }
    if !new.target_co2.is_finite() || new.target_co2 < 0.0 {
        return Err(AppError::bad_request("target_co2 must be a non-negative number"));
    }
    if new.end_date < new.start_date {
        return Err(AppError::bad_request("end_date must not be before start_date"));
    }

    let challenge = Challenge {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: new.description.trim().to_string(),
        target_co2: new.target_co2,
        start_date: new.start_date,
        end_date: new.end_date,
    };
    data.challenges.push(challenge.clone());
    Ok(challenge)
}

pub fn list_challenges(data: &AppData, user_id: &str, today: NaiveDate) -> Vec<ChallengeView> {
    data.challenges
        .iter()
        .map(|challenge| challenge_view(data, challenge, user_id, today))
        .collect()
}

/// Progress counts only participants' actions dated inside the challenge window.
pub fn challenge_view(
    data: &AppData,
    challenge: &Challenge,
    user_id: &str,
    today: NaiveDate,
) -> ChallengeView {
    let members: HashSet<&str> = data
        .participants
        .iter()
        .filter(|participant| participant.challenge_id == challenge.id)
        .map(|participant| participant.user_id.as_str())
        .collect();

    let total_co2_saved: f64 = data
        .actions
        .iter()
        .filter(|action| members.contains(action.user_id.as_str()))
        .filter(|action| (challenge.start_date..=challenge.end_date).contains(&action.action_date))
        .map(|action| action.co2_saved)
        .sum();

    ChallengeView {
        challenge: challenge.clone(),
        is_active: (challenge.start_date..=challenge.end_date).contains(&today),
        participant_count: members.len(),
        total_co2_saved,
        progress_percent: progress_percent(total_co2_saved, challenge.target_co2),
        user_joined: members.contains(user_id),
    }
}

pub fn join(data: &mut AppData, challenge_id: Uuid, user_id: &str) -> Result<(), AppError> {
    if !data.challenges.iter().any(|challenge| challenge.id == challenge_id) {
        return Err(AppError::not_found(format!("challenge {challenge_id} does not exist")));
    }
    if is_member(data, challenge_id, user_id) {
        return Err(AppError::conflict("already joined this challenge"));
    }

    data.participants.push(ChallengeParticipant {
        challenge_id,
        user_id: user_id.to_string(),
        joined_at: Utc::now(),
    });
    Ok(())
}

pub fn leave(data: &mut AppData, challenge_id: Uuid, user_id: &str) -> Result<(), AppError> {
    if !is_member(data, challenge_id, user_id) {
        return Err(AppError::not_found("not a participant of this challenge"));
    }
    data.participants
        .retain(|participant| !is_membership(participant, challenge_id, user_id));
    Ok(())
}

fn is_member(data: &AppData, challenge_id: Uuid, user_id: &str) -> bool {
    data.participants
        .iter()
        .any(|participant| is_membership(participant, challenge_id, user_id))
}

fn is_membership(participant: &ChallengeParticipant, challenge_id: Uuid, user_id: &str) -> bool {
    participant.challenge_id == challenge_id && participant.user_id == user_id
}

fn progress_percent(total: f64, target: f64) -> f64 {
    if target > 0.0 {
        (total / target * 100.0).min(100.0)
    } else {
        0.0
    }
}
