/// Boss encounter generation: three narrated phases, each with its own
/// simulated d20 check.
use tracing::debug;

use crate::core::classifier::boss_type;
use crate::core::selector::roll_check;
use crate::core::templates::{keys, Bindings, TemplateError, TemplateSet, PHASE_COUNT};
use crate::schema::character::CharacterSheet;
use crate::schema::encounter::{BossType, Encounter, Phase, RollTier};
use crate::schema::quest::Quest;

struct PhaseShape {
    title: &'static str,
    salt: &'static str,
    progress_marker: &'static str,
}

const PHASES: [PhaseShape; PHASE_COUNT as usize] = [
    PhaseShape {
        title: "The Approach",
        salt: "",
        progress_marker: "25%",
    },
    PhaseShape {
        title: "The Twist",
        salt: "_twist",
        progress_marker: "50%",
    },
    PhaseShape {
        title: "The Resolution",
        salt: "_final",
        progress_marker: "100%",
    },
];

/// Seed for the simulated check of one phase.
pub fn dice_seed(quest_name: &str, phase: u8, player_level: u32) -> String {
    format!("{}_phase{}_{}", quest_name, phase, player_level)
}

/// Generate the encounter for `quest` against a character of `sheet`'s
/// level. Works for any difficulty; only the narrative framing assumes a
/// boss.
pub fn generate_encounter(
    quest: &Quest,
    sheet: &CharacterSheet,
    templates: &TemplateSet,
) -> Result<Encounter, TemplateError> {
    let title = if quest.original_title().is_empty() {
        quest.name()
    } else {
        quest.original_title()
    };
    let boss = boss_type(quest.category(), title);
    let boss_name = boss.display_name();

    let mut bindings = Bindings::default();
    bindings.insert("boss", boss.common_name().to_string());
    bindings.insert("quest", quest.name().to_string());

    let phases = (1..=PHASE_COUNT)
        .zip(PHASES.iter())
        .map(|(number, shape)| build_phase(number, shape, boss, quest, sheet.level, &bindings, templates))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary_bindings = Bindings::default();
    summary_bindings.insert("boss", boss.common_name().to_string());
    summary_bindings.insert("difficulty", quest.difficulty().name().to_string());
    let encounter_summary =
        templates.render(keys::ENCOUNTER_SUMMARY, quest.name(), &summary_bindings)?;

    debug!(quest = quest.name(), boss = boss.key(), "generated encounter");

    Ok(Encounter {
        boss_type: boss,
        boss_name: boss_name.to_string(),
        quest_name: quest.name().to_string(),
        quest_difficulty: quest.difficulty(),
        player_level: sheet.level,
        phases,
        total_xp_reward: quest.xp_reward(),
        estimated_duration: quest.duration_minutes(),
        encounter_summary,
    })
}

fn build_phase(
    number: u8,
    shape: &PhaseShape,
    boss: BossType,
    quest: &Quest,
    player_level: u32,
    bindings: &Bindings,
    templates: &TemplateSet,
) -> Result<Phase, TemplateError> {
    let seed = format!("{}{}", quest.name(), shape.salt);

    let dice_roll = roll_check(&dice_seed(quest.name(), number, player_level));
    let roll_tier = RollTier::from_roll(dice_roll);

    let narration = templates
        .pool_or(
            &keys::phase_narration(number, boss.key()),
            &keys::phase_narration(number, keys::GENERIC_BOSS),
        )?
        .pick(&seed)?
        .render(bindings)?;
    let roll_flavor = templates.render(&keys::phase_roll(number, roll_tier), &seed, bindings)?;
    let challenge = templates.render(&keys::phase_challenge(number), &seed, bindings)?;

    let (victory_xp, victory_message) = if number == PHASE_COUNT {
        let mut victory_bindings = Bindings::default();
        victory_bindings.insert("boss", boss.common_name().to_string());
        victory_bindings.insert("xp", quest.xp_reward().to_string());
        let message = templates.render(keys::FINAL_VICTORY, &seed, &victory_bindings)?;
        (Some(quest.xp_reward()), Some(message))
    } else {
        (None, None)
    };

    Ok(Phase {
        phase: number,
        title: shape.title.to_string(),
        narration,
        dice_roll,
        roll_tier,
        roll_flavor,
        challenge,
        progress_marker: shape.progress_marker.to_string(),
        victory_xp,
        victory_message,
    })
}
