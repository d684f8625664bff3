//! Pet experience and level computation.
//!
//! A user's pet grows from the XP of the quests they completed. Every
//! [`thresholds::XP_PER_LEVEL`] points is one level, starting at level 1.
//!
//! Rewards are resolved against the runtime quest list only: a completed
//! quest that exists solely in the static fixtures contributes zero XP.
//!
//! # Example
//!
//! ```
//! use taskpet::models::pet::{level_for, current_level_xp};
//!
//! assert_eq!(level_for(125), 2);
//! assert_eq!(current_level_xp(125), 25);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Progress, Quest};

/// Level constants.
pub mod thresholds {
    /// Experience needed to advance one level.
    pub const XP_PER_LEVEL: u64 = 100;

    /// Number of completions shown in the recent list.
    pub const RECENT_LIMIT: usize = 5;
}

use thresholds::{RECENT_LIMIT, XP_PER_LEVEL};

/// Level for a total amount of XP (level 1 at 0 XP).
pub fn level_for(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

/// XP earned towards the next level.
pub fn current_level_xp(total_xp: u64) -> u64 {
    total_xp % XP_PER_LEVEL
}

/// Fill of the level progress bar, in percent.
pub fn progress_percent(total_xp: u64) -> f64 {
    current_level_xp(total_xp) as f64 / XP_PER_LEVEL as f64 * 100.0
}

/// Reward of `quest_id` in `quests`, or 0 when it cannot be found.
pub fn reward_for(quests: &[Quest], quest_id: &str) -> u32 {
    quests
        .iter()
        .find(|q| q.id == quest_id)
        .map(|q| q.xp_reward)
        .unwrap_or(0)
}

/// A completed quest in the recent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCompletion {
    pub quest_id: String,
    pub quest_title: String,
    pub xp_reward: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Aggregated pet view for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStats {
    pub pet_name: String,
    pub level: u64,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    pub progress_percent: f64,
    pub total_xp: u64,
    pub completed_quests: usize,
    pub recent: Vec<RecentCompletion>,
}

impl PetStats {
    /// Compute the pet for `user_id` from all progress records and the
    /// runtime quest list.
    pub fn compute(
        user_id: &str,
        user_name: &str,
        progress: &[Progress],
        runtime_quests: &[Quest],
    ) -> Self {
        let completed: Vec<&Progress> = progress
            .iter()
            .filter(|p| p.user_id == user_id && p.is_completed())
            .collect();

        let total_xp: u64 = completed
            .iter()
            .map(|p| u64::from(reward_for(runtime_quests, &p.quest_id)))
            .sum();

        Self {
            pet_name: format!("{}'s Pet", user_name),
            level: level_for(total_xp),
            current_level_xp: current_level_xp(total_xp),
            next_level_xp: XP_PER_LEVEL,
            progress_percent: progress_percent(total_xp),
            total_xp,
            completed_quests: completed.len(),
            recent: recent_completions(&completed, runtime_quests),
        }
    }
}

/// Most recent completions first; records without a timestamp sort last.
fn recent_completions(completed: &[&Progress], runtime_quests: &[Quest]) -> Vec<RecentCompletion> {
    let mut sorted: Vec<&Progress> = completed.to_vec();
    sorted.sort_by(|a, b| match (a.completed_at, b.completed_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    sorted
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|p| RecentCompletion {
            quest_id: p.quest_id.clone(),
            quest_title: p.quest_title.clone(),
            xp_reward: reward_for(runtime_quests, &p.quest_id),
            completed_at: p.completed_at,
        })
        .collect()
}
