use serde::{Deserialize, Serialize};

use super::character::{CharacterClass, StatBlock};
use super::quest::{Category, Difficulty, Quest};

/// Narration produced for a completed quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narration {
    pub victory: String,
    /// Present only when the quest pushed the character over a level.
    pub level_up: Option<String>,
    pub quest_name: String,
    pub difficulty: Difficulty,
    pub category: Category,
}

impl Narration {
    /// Victory text followed by the level-up text, if any.
    pub fn full_text(&self) -> String {
        match &self.level_up {
            Some(level_up) => format!("{} {}", self.victory, level_up),
            None => self.victory.clone(),
        }
    }
}

/// Report of one quest resolution. Computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub quest_completed: Quest,
    pub xp_gained: u32,
    pub new_total_xp: u64,
    pub previous_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    pub xp_to_next_level: u64,
    pub class: CharacterClass,
    pub title: String,
    pub updated_stats: StatBlock,
    /// Bonus per stat earned over the whole completion history.
    pub stat_changes: StatBlock,
    pub total_quests_completed: usize,
    pub narration: Narration,
}
