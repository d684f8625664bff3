//! The pet view.

use super::{Output, json_of};
use crate::Result;
use crate::models::pet::PetStats;
use crate::state::AppState;

impl Output for PetStats {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        const BAR_WIDTH: usize = 20;
        let filled = (self.progress_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled.min(BAR_WIDTH)),
            "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
        );

        let mut lines = vec![
            format!("Pet: {}", self.pet_name),
            format!("Level {}", self.level),
            format!(
                "XP: {}/{} {} {:.0}%",
                self.current_level_xp, self.next_level_xp, bar, self.progress_percent
            ),
            format!(
                "Completed quests: {}  Total XP: {}",
                self.completed_quests, self.total_xp
            ),
            String::new(),
            "Recent:".to_string(),
        ];

        if self.recent.is_empty() {
            lines.push("  No completed quests yet.".to_string());
        }
        for r in &self.recent {
            let date = r
                .completed_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            lines.push(format!("  {} - {} XP (completed {})", r.quest_title, r.xp_reward, date));
        }
        lines.join("\n")
    }
}

/// Pet stats for the current user.
pub fn stats(state: &AppState) -> Result<PetStats> {
    let session = state.require_session()?;
    let progress = state.progress()?;
    let runtime_quests = state.runtime_quests()?;

    Ok(PetStats::compute(
        &session.user_id,
        &session.user_name,
        &progress,
        &runtime_quests,
    ))
}
