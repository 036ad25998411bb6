use serde::{Deserialize, Serialize};

use super::quest::Difficulty;

/// Boss archetypes for boss-tier quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossType {
    DeadlineDragon,
    CodeLich,
    BureaucracyBehemoth,
    PresentationPhoenix,
    DocumentationDemon,
    EnduranceTitan,
    KnowledgeDevourer,
    ChaosEntity,
}

impl BossType {
    pub const ALL: [BossType; 8] = [
        Self::DeadlineDragon,
        Self::CodeLich,
        Self::BureaucracyBehemoth,
        Self::PresentationPhoenix,
        Self::DocumentationDemon,
        Self::EnduranceTitan,
        Self::KnowledgeDevourer,
        Self::ChaosEntity,
    ];

    /// Returns the wire name for this boss type (e.g., "code_lich").
    pub fn key(&self) -> &'static str {
        match self {
            Self::DeadlineDragon => "deadline_dragon",
            Self::CodeLich => "code_lich",
            Self::BureaucracyBehemoth => "bureaucracy_behemoth",
            Self::PresentationPhoenix => "presentation_phoenix",
            Self::DocumentationDemon => "documentation_demon",
            Self::EnduranceTitan => "endurance_titan",
            Self::KnowledgeDevourer => "knowledge_devourer",
            Self::ChaosEntity => "chaos_entity",
        }
    }

    /// Lower-case name without the article, for use mid-sentence:
    /// "lich of legacy code".
    pub fn common_name(&self) -> &'static str {
        match self {
            Self::DeadlineDragon => "dragon of deadlines",
            Self::CodeLich => "lich of legacy code",
            Self::BureaucracyBehemoth => "behemoth of bureaucracy",
            Self::PresentationPhoenix => "phoenix of presentations",
            Self::DocumentationDemon => "demon of documentation",
            Self::EnduranceTitan => "titan of endurance",
            Self::KnowledgeDevourer => "devourer of knowledge",
            Self::ChaosEntity => "entity of chaos",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DeadlineDragon => "The Dragon of Deadlines",
            Self::CodeLich => "The Lich of Legacy Code",
            Self::BureaucracyBehemoth => "The Behemoth of Bureaucracy",
            Self::PresentationPhoenix => "The Phoenix of Presentations",
            Self::DocumentationDemon => "The Demon of Documentation",
            Self::EnduranceTitan => "The Titan of Endurance",
            Self::KnowledgeDevourer => "The Devourer of Knowledge",
            Self::ChaosEntity => "The Entity of Chaos",
        }
    }
}

/// Flavor tier of a simulated d20 check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollTier {
    Critical,
    Neutral,
    Setback,
}

impl RollTier {
    pub const CRITICAL_AT: u8 = 18;
    pub const SETBACK_AT: u8 = 3;

    pub fn from_roll(roll: u8) -> Self {
        if roll >= Self::CRITICAL_AT {
            Self::Critical
        } else if roll <= Self::SETBACK_AT {
            Self::Setback
        } else {
            Self::Neutral
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Neutral => "neutral",
            Self::Setback => "setback",
        }
    }
}

/// One beat of a boss encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: u8,
    pub title: String,
    pub narration: String,
    pub dice_roll: u8,
    pub roll_tier: RollTier,
    pub roll_flavor: String,
    pub challenge: String,
    pub progress_marker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory_xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory_message: Option<String>,
}

/// A three-phase boss encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub boss_type: BossType,
    pub boss_name: String,
    pub quest_name: String,
    pub quest_difficulty: Difficulty,
    pub player_level: u32,
    pub phases: Vec<Phase>,
    pub total_xp_reward: u32,
    pub estimated_duration: u32,
    pub encounter_summary: String,
}
