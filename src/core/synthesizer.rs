/// Quest synthesis: one calendar event in, one quest out.
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::core::classifier::categorize;
use crate::core::clock::parse_timestamp;
use crate::core::progression::difficulty_from_duration;
use crate::core::selector::digest;
use crate::core::templates::{keys, Bindings, TemplateError, TemplateSet};
use crate::schema::quest::{CalendarEvent, EventTime, NewQuest, Quest, DEFAULT_DURATION_MINUTES};

/// Title used when an event carries none at all.
pub const UNKNOWN_TITLE: &str = "Unknown Task";

/// Minutes between two ISO-8601 timestamps, or the default when either
/// side is missing or unreadable. Negative spans clamp to zero.
pub fn duration_minutes(start: Option<&str>, end: Option<&str>) -> u32 {
    let (Some(start), Some(end)) = (start.and_then(parse_timestamp), end.and_then(parse_timestamp))
    else {
        warn!(?start, ?end, "unreadable event span, assuming {} minutes", DEFAULT_DURATION_MINUTES);
        return DEFAULT_DURATION_MINUTES;
    };

    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        warn!(%start, %end, "event ends before it starts");
        return 0;
    }
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Word-style title casing: the first letter of every run of letters is
/// upper-cased and the rest of the run lower-cased.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut in_letters = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if in_letters {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_letters = true;
        } else {
            out.push(c);
            in_letters = false;
        }
    }
    out
}

fn words(title: &str) -> Vec<&str> {
    title
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Short phrase naming the task: first and last word of long titles,
/// the first two words of two- or three-word titles, otherwise the only
/// word, or "Unknown".
pub fn task_phrase(title: &str) -> String {
    let words = words(title);
    match words.as_slice() {
        [] => "Unknown".to_string(),
        [only] => title_case(only),
        [first, second] | [first, second, _] => {
            format!("{} {}", title_case(first), title_case(second))
        }
        [first, .., last] => format!("{} {}", title_case(first), title_case(last)),
    }
}

/// Stable per-title quest id stamped with the creation time.
pub fn quest_id(title: &str, now: DateTime<Utc>) -> String {
    format!("quest_{}_{:03}", now.format("%Y%m%d_%H%M%S"), digest(title) % 1000)
}

/// Build a quest from a calendar event.
pub fn synthesize(
    event: &CalendarEvent,
    templates: &TemplateSet,
    now: DateTime<Utc>,
    source: &str,
) -> Result<Quest, TemplateError> {
    let title = event.title.as_deref().unwrap_or(UNKNOWN_TITLE);
    let description = event.description.as_deref().unwrap_or("");

    let duration = duration_minutes(
        event.start.as_ref().and_then(EventTime::as_str),
        event.end.as_ref().and_then(EventTime::as_str),
    );
    let category = categorize(title, description);
    let difficulty = difficulty_from_duration(duration);

    let mut bindings = Bindings::default();
    bindings.insert("task", task_phrase(title));
    let name = templates.render(&keys::quest_name(category), title, &bindings)?;
    let flavor = templates.render(&keys::flavor(category), title, &bindings)?;

    let quest = Quest::new(NewQuest {
        id: quest_id(title, now),
        name,
        description: flavor,
        category,
        difficulty,
        source: source.to_string(),
        source_id: event.id.clone().unwrap_or_default(),
        created_at: now,
        original_title: title.to_string(),
        duration_minutes: duration,
    });

    info!(
        id = quest.id(),
        name = quest.name(),
        category = category.name(),
        difficulty = difficulty.name(),
        xp = quest.xp_reward(),
        "synthesized quest"
    );
    Ok(quest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::quest::{Category, Difficulty, QuestStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 5, 9).unwrap()
    }

    fn templates() -> TemplateSet {
        TemplateSet::builtin().unwrap()
    }

    #[test]
    fn duration_from_span() {
        assert_eq!(
            duration_minutes(Some("2024-03-01T09:00:00Z"), Some("2024-03-01T09:45:00Z")),
            45
        );
        assert_eq!(
            duration_minutes(Some("2024-03-01T09:00:00+01:00"), Some("2024-03-01T08:30:00Z")),
            30
        );
    }

    #[test]
    fn duration_truncates_partial_minutes() {
        assert_eq!(
            duration_minutes(Some("2024-03-01T09:00:00Z"), Some("2024-03-01T09:29:59Z")),
            29
        );
    }

    #[test]
    fn duration_falls_back_on_bad_input() {
        assert_eq!(duration_minutes(None, None), DEFAULT_DURATION_MINUTES);
        assert_eq!(
            duration_minutes(Some("yesterday"), Some("2024-03-01T09:00:00Z")),
            DEFAULT_DURATION_MINUTES
        );
        assert_eq!(
            duration_minutes(Some("2024-03-01T09:00:00Z"), None),
            DEFAULT_DURATION_MINUTES
        );
    }

    #[test]
    fn duration_clamps_negative_span() {
        assert_eq!(
            duration_minutes(Some("2024-03-01T10:00:00Z"), Some("2024-03-01T09:00:00Z")),
            0
        );
    }

    #[test]
    fn title_casing() {
        assert_eq!(title_case("weekly"), "Weekly");
        assert_eq!(title_case("API"), "Api");
        assert_eq!(title_case("q3"), "Q3");
        assert_eq!(title_case("2nd"), "2Nd");
        assert_eq!(title_case("pre_read"), "Pre_Read");
    }

    #[test]
    fn task_phrases() {
        assert_eq!(task_phrase(""), "Unknown");
        assert_eq!(task_phrase("!!!"), "Unknown");
        assert_eq!(task_phrase("gym"), "Gym");
        assert_eq!(task_phrase("deep work"), "Deep Work");
        assert_eq!(task_phrase("Weekly Sync Meeting"), "Weekly Sync");
        assert_eq!(task_phrase("Refactor Legacy Payment Module"), "Refactor Module");
        assert_eq!(task_phrase("1:1 with Sam - career chat"), "1 Chat");
    }

    #[test]
    fn quest_id_format() {
        // digest("Weekly Sync Meeting") % 1000 == 3
        assert_eq!(quest_id("Weekly Sync Meeting", now()), "quest_20240301_080509_003");
    }

    #[test]
    fn synthesize_meeting() {
        let event = CalendarEvent::titled("Weekly Sync Meeting")
            .with_span("2024-03-01T09:00:00Z", "2024-03-01T09:45:00Z");
        let quest = synthesize(&event, &templates(), now(), "google_calendar").unwrap();

        assert_eq!(quest.category(), Category::Meeting);
        assert_eq!(quest.difficulty(), Difficulty::Medium);
        assert_eq!(quest.xp_reward(), 50);
        assert!(!quest.is_boss());
        assert_eq!(quest.duration_minutes(), 45);
        assert_eq!(quest.status(), QuestStatus::Active);
        assert_eq!(quest.created_at(), now());
        assert_eq!(quest.original_title(), "Weekly Sync Meeting");
        assert_eq!(quest.source(), "google_calendar");
        // digest % 5 == 3, digest % 3 == 2
        assert_eq!(quest.name(), "The Weekly Sync Tribunal");
        assert_eq!(
            quest.description(),
            "Voices echo through the halls of commerce. Will your words carry the day?"
        );
    }

    #[test]
    fn synthesize_boss() {
        let event = CalendarEvent::titled("Refactor Legacy Payment Module")
            .with_span("2024-03-01T13:00:00Z", "2024-03-01T15:30:00Z");
        let quest = synthesize(&event, &templates(), now(), "google_calendar").unwrap();

        assert_eq!(quest.category(), Category::Coding);
        assert_eq!(quest.difficulty(), Difficulty::Boss);
        assert_eq!(quest.xp_reward(), 250);
        assert!(quest.is_boss());
        assert_eq!(quest.duration_minutes(), 150);
        assert_eq!(quest.name(), "The Refactor Module Algorithm");
    }

    #[test]
    fn synthesize_without_title_or_times() {
        let quest = synthesize(&CalendarEvent::default(), &templates(), now(), "tasks").unwrap();
        assert_eq!(quest.original_title(), UNKNOWN_TITLE);
        assert_eq!(quest.duration_minutes(), DEFAULT_DURATION_MINUTES);
        assert_eq!(quest.difficulty(), Difficulty::Medium);
        assert_eq!(quest.category(), Category::Misc);
        assert!(quest.name().contains("Unknown Task"));
    }

    #[test]
    fn synthesize_is_repeatable() {
        let event = CalendarEvent::titled("Write quarterly report")
            .with_span("2024-03-01T09:00:00Z", "2024-03-01T10:30:00Z");
        let a = synthesize(&event, &templates(), now(), "google_calendar").unwrap();
        let b = synthesize(&event, &templates(), now(), "google_calendar").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.difficulty(), Difficulty::Hard);
        assert_eq!(a.category(), Category::Writing);
    }

    #[test]
    fn source_id_comes_from_event() {
        let mut event = CalendarEvent::titled("Yoga");
        event.id = Some("evt-42".to_string());
        let quest = synthesize(&event, &templates(), now(), "google_calendar").unwrap();
        assert_eq!(quest.source_id(), "evt-42");
    }
}
