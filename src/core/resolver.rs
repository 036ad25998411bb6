/// Quest resolution: XP, levels, class assignment, stat recount and
/// victory narration for one completed quest.
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::core::progression::{
    dominant_class, level_from_xp, level_title, stat_bonuses, xp_to_next_level,
    CLASS_ASSIGNMENT_LEVEL,
};
use crate::core::templates::{keys, Bindings, TemplateError, TemplateSet};
use crate::schema::character::{CharacterClass, CharacterSheet};
use crate::schema::quest::Quest;
use crate::schema::resolution::{Narration, Resolution};

/// Apply `quest` to `sheet`. `history` is every quest completed before
/// this one; bonuses are recounted over it plus `quest`.
pub fn resolve(
    quest: &Quest,
    sheet: &CharacterSheet,
    history: &[Quest],
    templates: &TemplateSet,
    now: DateTime<Utc>,
) -> Result<Resolution, TemplateError> {
    let xp_gained = quest.xp_reward();
    let new_total_xp = sheet.xp.saturating_add(u64::from(xp_gained));
    let new_level = level_from_xp(new_total_xp);
    let leveled_up = new_level > sheet.level;

    if quest.is_completed() {
        warn!(id = quest.id(), "resolving a quest that is already completed");
    }
    let mut completed = quest.clone();
    completed.complete(now);

    let mut extended: Vec<Quest> = Vec::with_capacity(history.len() + 1);
    extended.extend_from_slice(history);
    extended.push(completed.clone());

    let bonuses = stat_bonuses(&extended);

    let class = if new_level >= CLASS_ASSIGNMENT_LEVEL && !sheet.class.is_assigned() {
        let assigned = dominant_class(&extended);
        info!(class = assigned.name(), "class assigned");
        assigned
    } else {
        sheet.class
    };

    let updated_stats = sheet.stats.plus(&bonuses);
    let title = level_title(new_level, class);
    let narration = narrate(&completed, xp_gained, leveled_up, new_level, class, templates)?;

    info!(
        quest = completed.name(),
        xp_gained,
        new_total_xp,
        new_level,
        leveled_up,
        "quest resolved"
    );

    Ok(Resolution {
        quest_completed: completed,
        xp_gained,
        new_total_xp,
        previous_level: sheet.level,
        new_level,
        leveled_up,
        xp_to_next_level: xp_to_next_level(new_level, new_total_xp),
        class,
        title: title.to_string(),
        updated_stats,
        stat_changes: bonuses,
        total_quests_completed: extended.len(),
        narration,
    })
}

fn narrate(
    quest: &Quest,
    xp_gained: u32,
    leveled_up: bool,
    new_level: u32,
    class: CharacterClass,
    templates: &TemplateSet,
) -> Result<Narration, TemplateError> {
    let seed = quest.name();

    let mut bindings = Bindings::default();
    bindings.insert("xp", xp_gained.to_string());
    bindings.insert("quest", quest.name().to_string());
    let victory = templates.render(&keys::victory(quest.difficulty()), seed, &bindings)?;

    let level_up = if leveled_up {
        let mut bindings = Bindings::default();
        bindings.insert("level", new_level.to_string());
        bindings.insert("title", level_title(new_level, class).to_string());
        bindings.insert("class", class.name().to_string());
        let text = templates.render(keys::LEVEL_UP, &format!("{}_level_up", seed), &bindings)?;
        Some(text)
    } else {
        None
    };

    Ok(Narration {
        victory,
        level_up,
        quest_name: quest.name().to_string(),
        difficulty: quest.difficulty(),
        category: quest.category(),
    })
}
