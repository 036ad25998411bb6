/// JSON I/O for the command-line tools: input reading, calendar payload
/// shapes, request envelopes and logging setup.
use std::io::Read;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::schema::character::CharacterSheet;
use crate::schema::quest::{CalendarEvent, Quest};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "quest_engine=info";

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported payload: {0}")]
    UnsupportedShape(String),
}

/// Install the stderr subscriber. Stdout is reserved for JSON results.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Read the whole of `path`, or stdin when no path is given.
pub fn read_input(path: Option<&str>) -> Result<String, AdapterError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Calendar events from a payload: a `{"items": [...]}` listing, a bare
/// array, or one event object. Entries that do not decode are skipped with
/// a warning.
pub fn events_from_value(payload: Value) -> Result<Vec<CalendarEvent>, AdapterError> {
    let raw = match payload {
        Value::Object(mut map) if map.contains_key("items") => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AdapterError::UnsupportedShape(
                    "\"items\" must be an array".to_string(),
                ))
            }
        },
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(AdapterError::UnsupportedShape(format!(
                "expected an event object or array, got {}",
                kind(&other)
            )))
        }
    };

    let mut events = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<CalendarEvent>(value) {
            Ok(event) => events.push(event),
            Err(e) => warn!(index, error = %e, "skipping event that failed to decode"),
        }
    }
    Ok(events)
}

/// Parse and unpack a calendar payload.
pub fn parse_events(input: &str) -> Result<Vec<CalendarEvent>, AdapterError> {
    events_from_value(serde_json::from_str(input)?)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Input of `resolve_quest`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub quest: Quest,
    #[serde(default)]
    pub character_sheet: CharacterSheet,
    #[serde(default)]
    pub completed_quests: Vec<Quest>,
}

/// Input of `boss_fight`.
#[derive(Debug, Default, Deserialize)]
pub struct EncounterRequest {
    #[serde(default)]
    pub quest: Quest,
    #[serde(default)]
    pub character_sheet: CharacterSheet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::character::CharacterClass;
    use serde_json::json;

    #[test]
    fn google_listing_shape() {
        let events = events_from_value(json!({
            "kind": "calendar#events",
            "items": [
                {"id": "a", "summary": "Standup", "start": {"dateTime": "2024-03-01T09:00:00Z"}},
                {"id": "b", "summary": "Deep work"},
            ],
        }))
        .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title.as_deref(), Some("Standup"));
        assert_eq!(events[1].id.as_deref(), Some("b"));
    }

    #[test]
    fn bare_array_and_single_event() {
        let events = events_from_value(json!([{"title": "One"}, {"title": "Two"}])).unwrap();
        assert_eq!(events.len(), 2);

        let events = events_from_value(json!({"title": "Solo"})).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Solo"));
    }

    #[test]
    fn undecodable_events_are_skipped() {
        let events = events_from_value(json!([
            {"title": "Good"},
            {"title": 42},
            "not an event",
            {"title": "Also good"},
        ]))
        .unwrap();
        let titles: Vec<_> = events.iter().filter_map(|e| e.title.as_deref()).collect();
        assert_eq!(titles, vec!["Good", "Also good"]);
    }

    #[test]
    fn unsupported_shapes() {
        assert!(matches!(
            events_from_value(json!("just text")),
            Err(AdapterError::UnsupportedShape(_))
        ));
        assert!(matches!(
            events_from_value(json!({"items": "nope"})),
            Err(AdapterError::UnsupportedShape(_))
        ));
        assert!(matches!(parse_events("{not json"), Err(AdapterError::Json(_))));
    }

    #[test]
    fn resolve_request_defaults() {
        let request: ResolveRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.quest.name(), "Unknown Quest");
        assert_eq!(request.quest.xp_reward(), 25);
        assert_eq!(request.character_sheet, CharacterSheet::default());
        assert!(request.completed_quests.is_empty());
    }

    #[test]
    fn resolve_request_rejects_non_numeric_xp() {
        let result: Result<ResolveRequest, _> = serde_json::from_value(json!({
            "character_sheet": {"xp": "lots"},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn encounter_request_reads_sheet() {
        let request: EncounterRequest = serde_json::from_value(json!({
            "quest": {"name": "The Final Sprint", "difficulty": "boss"},
            "character_sheet": {"level": 6, "class": "Ranger"},
        }))
        .unwrap();
        assert!(request.quest.is_boss());
        assert_eq!(request.character_sheet.level, 6);
        assert_eq!(request.character_sheet.class, CharacterClass::Ranger);
    }
}
