/// Progression tables: difficulty, XP, levels, stats, classes and titles.
///
/// All pure lookups and arithmetic over fixed tables.
use crate::schema::character::{CharacterClass, Stat, StatBlock};
use crate::schema::quest::{Category, Difficulty, Quest};

/// XP needed to reach levels 1 through 10.
pub const XP_THRESHOLDS: [u64; 10] = [0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500];

/// Flat cost of every level past the end of [`XP_THRESHOLDS`].
pub const XP_PER_LEVEL_BEYOND_TABLE: u64 = 1000;

/// Completions of a stat's categories needed per point of bonus.
pub const COMPLETIONS_PER_BONUS: usize = 5;

/// Level at which an unclassed character receives a class.
pub const CLASS_ASSIGNMENT_LEVEL: u32 = 3;

const CLASSED_TITLES: [&str; 10] = [
    "Novice",
    "Apprentice",
    "Journeyman",
    "Expert",
    "Master",
    "Adept",
    "Veteran",
    "Elite",
    "Legendary",
    "Paragon",
];

const UNCLASSED_TITLES: [&str; 3] = [
    "Novice Questgiver",
    "Apprentice Adventurer",
    "Journeyman Hero",
];

/// Title for any level past the end of a title table.
pub const FALLBACK_TITLE: &str = "Legendary";

const CATEGORY_COUNT: usize = Category::ALL.len();

pub fn difficulty_from_duration(minutes: u32) -> Difficulty {
    match minutes {
        0..=29 => Difficulty::Easy,
        30..=60 => Difficulty::Medium,
        61..=120 => Difficulty::Hard,
        _ => Difficulty::Boss,
    }
}

pub fn xp_from_difficulty(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 25,
        Difficulty::Medium => 50,
        Difficulty::Hard => 100,
        Difficulty::Boss => 250,
    }
}

/// XP at which `level` begins. Levels below 1 are treated as 1.
pub fn xp_threshold(level: u32) -> u64 {
    let level = level.max(1) as usize;
    let table_max = XP_THRESHOLDS.len();
    if level <= table_max {
        XP_THRESHOLDS[level - 1]
    } else {
        let extra = (level - table_max) as u64;
        XP_THRESHOLDS[table_max - 1].saturating_add(extra.saturating_mul(XP_PER_LEVEL_BEYOND_TABLE))
    }
}

/// The greatest level whose threshold is at or below `xp`.
pub fn level_from_xp(xp: u64) -> u32 {
    let top = XP_THRESHOLDS[XP_THRESHOLDS.len() - 1];
    if xp >= top {
        let beyond = (xp - top) / XP_PER_LEVEL_BEYOND_TABLE;
        let beyond = u32::try_from(beyond).unwrap_or(u32::MAX - XP_THRESHOLDS.len() as u32);
        return XP_THRESHOLDS.len() as u32 + beyond;
    }
    XP_THRESHOLDS.iter().take_while(|t| **t <= xp).count() as u32
}

/// XP still missing before `level + 1`.
pub fn xp_to_next_level(level: u32, xp: u64) -> u64 {
    xp_threshold(level.saturating_add(1)).saturating_sub(xp)
}

pub fn stat_from_category(category: Category) -> Stat {
    match category {
        Category::Coding => Stat::Int,
        Category::Meeting => Stat::Cha,
        Category::Writing => Stat::Wis,
        Category::Exercise => Stat::Str,
        Category::Research => Stat::Wis,
        Category::Misc => Stat::Con,
    }
}

pub fn class_from_category(category: Category) -> CharacterClass {
    match category {
        Category::Coding => CharacterClass::Artificer,
        Category::Meeting => CharacterClass::Bard,
        Category::Writing => CharacterClass::Scribe,
        Category::Exercise => CharacterClass::Barbarian,
        Category::Research => CharacterClass::Wizard,
        Category::Misc => CharacterClass::Ranger,
    }
}

fn category_counts(history: &[Quest]) -> [usize; CATEGORY_COUNT] {
    let mut counts = [0usize; CATEGORY_COUNT];
    for quest in history {
        counts[quest.category().index()] += 1;
    }
    counts
}

/// Bonus per stat over a completion history: one point per
/// [`COMPLETIONS_PER_BONUS`] completions mapped to that stat.
pub fn stat_bonuses(history: &[Quest]) -> StatBlock {
    let counts = category_counts(history);
    let mut per_stat = StatBlock::zeroed();
    for category in Category::ALL {
        let stat = stat_from_category(category);
        per_stat.set(stat, per_stat.get(stat) + counts[category.index()] as i32);
    }

    let mut bonuses = StatBlock::zeroed();
    for (stat, count) in per_stat.iter() {
        bonuses.set(stat, count / COMPLETIONS_PER_BONUS as i32);
    }
    bonuses
}

/// Class of the most completed category. Ties go to the category listed
/// first; an empty history yields the first category's class.
pub fn dominant_class(history: &[Quest]) -> CharacterClass {
    let counts = category_counts(history);
    let mut best = Category::ALL[0];
    for category in Category::ALL {
        if counts[category.index()] > counts[best.index()] {
            best = category;
        }
    }
    class_from_category(best)
}

/// Title for a level. Unclassed characters use their own short table;
/// any level past a table's end is [`FALLBACK_TITLE`].
pub fn level_title(level: u32, class: CharacterClass) -> &'static str {
    let table: &[&'static str] = if class.is_assigned() {
        &CLASSED_TITLES
    } else {
        &UNCLASSED_TITLES
    };
    let index = level.max(1) as usize - 1;
    table.get(index).copied().unwrap_or(FALLBACK_TITLE)
}
