use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Value every stat starts from when the caller supplies none.
pub const BASE_STAT: i32 = 10;

/// The six character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "STR")]
    Str,
    #[serde(rename = "DEX")]
    Dex,
    #[serde(rename = "CON")]
    Con,
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "WIS")]
    Wis,
    #[serde(rename = "CHA")]
    Cha,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.abbreviation().eq_ignore_ascii_case(s.trim()))
    }
}

/// A full mapping of all six stats to values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock(BTreeMap<Stat, i32>);

impl StatBlock {
    /// Every stat set to `value`.
    pub fn uniform(value: i32) -> Self {
        Self(Stat::ALL.into_iter().map(|s| (s, value)).collect())
    }

    /// Every stat at [`BASE_STAT`].
    pub fn base() -> Self {
        Self::uniform(BASE_STAT)
    }

    pub fn zeroed() -> Self {
        Self::uniform(0)
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        self.0.insert(stat, value);
    }

    /// Stat-wise sum of two blocks.
    pub fn plus(&self, other: &StatBlock) -> StatBlock {
        Self(
            Stat::ALL
                .into_iter()
                .map(|s| (s, self.get(s).saturating_add(other.get(s))))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }
}

/// Character archetype. `Unclassed` until the first assignment, which
/// happens once and is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    Artificer,
    Bard,
    Scribe,
    Barbarian,
    Wizard,
    Ranger,
    #[default]
    Unclassed,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 7] = [
        Self::Artificer,
        Self::Bard,
        Self::Scribe,
        Self::Barbarian,
        Self::Wizard,
        Self::Ranger,
        Self::Unclassed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Artificer => "Artificer",
            Self::Bard => "Bard",
            Self::Scribe => "Scribe",
            Self::Barbarian => "Barbarian",
            Self::Wizard => "Wizard",
            Self::Ranger => "Ranger",
            Self::Unclassed => "Unclassed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::Unclassed)
    }
}

/// The player's progression state as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SheetRecord")]
pub struct CharacterSheet {
    pub level: u32,
    pub xp: u64,
    pub class: CharacterClass,
    pub stats: StatBlock,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            class: CharacterClass::Unclassed,
            stats: StatBlock::base(),
        }
    }
}

/// Wire shape of a character sheet. Missing fields take the documented
/// defaults and unknown class names read as unclassed; wrongly typed
/// numbers are rejected by serde itself.
#[derive(Debug, Deserialize)]
struct SheetRecord {
    level: Option<u32>,
    xp: Option<u64>,
    class: Option<String>,
    stats: Option<BTreeMap<String, i32>>,
}

impl From<SheetRecord> for CharacterSheet {
    fn from(record: SheetRecord) -> Self {
        let class = match record.class.as_deref() {
            None => CharacterClass::Unclassed,
            Some(name) => CharacterClass::parse(name).unwrap_or_else(|| {
                warn!(class = name, "unknown character class, treating as unclassed");
                CharacterClass::Unclassed
            }),
        };

        let mut stats = StatBlock::base();
        if let Some(supplied) = record.stats {
            for (key, value) in supplied {
                if let Some(stat) = Stat::parse(&key) {
                    stats.set(stat, value);
                }
            }
        }

        Self {
            level: record.level.unwrap_or(1).max(1),
            xp: record.xp.unwrap_or(0),
            class,
            stats,
        }
    }
}
