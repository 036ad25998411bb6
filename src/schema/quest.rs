use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clock::parse_timestamp;
use crate::core::progression::xp_from_difficulty;

/// Fallback duration for events whose start/end cannot be read.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// The quest taxonomy.
///
/// Declaration order matters: it is the classifier's precedence order and
/// the tie-break order when picking a dominant class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Coding,
    Meeting,
    Writing,
    Exercise,
    Research,
    Misc,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Coding,
        Self::Meeting,
        Self::Writing,
        Self::Exercise,
        Self::Research,
        Self::Misc,
    ];

    /// Returns the wire name for this category (e.g., "coding").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Meeting => "meeting",
            Self::Writing => "writing",
            Self::Exercise => "exercise",
            Self::Research => "research",
            Self::Misc => "misc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }

    /// Position in the fixed enumeration order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Difficulty tier, ordered from easiest to the boss tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Boss,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Boss];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Boss => "boss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Self::Boss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
}

impl QuestStatus {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Everything needed to mint a fresh quest. Reward and boss flag are not
/// part of it: both follow from `difficulty`.
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub source: String,
    pub source_id: String,
    pub created_at: DateTime<Utc>,
    pub original_title: String,
    pub duration_minutes: u32,
}

/// A gamified record of one real-world task.
///
/// Fields are read-only. `xp_reward` and `is_boss` are derived from the
/// difficulty when the quest is minted; the only mutation a quest ever sees
/// is completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestRecord")]
pub struct Quest {
    id: String,
    name: String,
    description: String,
    difficulty: Difficulty,
    xp_reward: u32,
    category: Category,
    is_boss: bool,
    source: String,
    source_id: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    status: QuestStatus,
    original_title: String,
    duration_minutes: u32,
}

impl Quest {
    pub fn new(new: NewQuest) -> Self {
        Self {
            id: new.id,
            name: new.name,
            description: new.description,
            xp_reward: xp_from_difficulty(new.difficulty),
            is_boss: new.difficulty.is_boss(),
            difficulty: new.difficulty,
            category: new.category,
            source: new.source,
            source_id: new.source_id,
            created_at: new.created_at,
            completed_at: None,
            status: QuestStatus::Active,
            original_title: new.original_title,
            duration_minutes: new.duration_minutes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    pub fn is_boss(&self) -> bool {
        self.is_boss
    }

    pub fn status(&self) -> QuestStatus {
        self.status
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// Transition to `completed`, stamping the completion time.
    pub(crate) fn complete(&mut self, at: DateTime<Utc>) {
        self.status = QuestStatus::Completed;
        self.completed_at = Some(at);
    }
}

/// Wire shape of a quest supplied by a caller. Every field is optional;
/// the conversion below applies the documented defaults.
#[derive(Debug, Default, Deserialize)]
struct QuestRecord {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    xp_reward: Option<u32>,
    status: Option<String>,
    created_at: Option<String>,
    completed_at: Option<String>,
    source: Option<String>,
    source_id: Option<String>,
    original_title: Option<String>,
    duration_minutes: Option<u32>,
}

/// The quest an empty record describes: "Unknown Quest", easy, misc.
impl Default for Quest {
    fn default() -> Self {
        Self::from(QuestRecord::default())
    }
}

impl From<QuestRecord> for Quest {
    fn from(record: QuestRecord) -> Self {
        let difficulty = record
            .difficulty
            .as_deref()
            .and_then(Difficulty::parse)
            .unwrap_or(Difficulty::Easy);

        Self {
            id: record.id.unwrap_or_default(),
            name: record
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown Quest".to_string()),
            description: record.description.unwrap_or_default(),
            xp_reward: record
                .xp_reward
                .unwrap_or_else(|| xp_from_difficulty(difficulty)),
            is_boss: difficulty.is_boss(),
            difficulty,
            category: record
                .category
                .as_deref()
                .and_then(Category::parse)
                .unwrap_or(Category::Misc),
            source: record.source.unwrap_or_default(),
            source_id: record.source_id.unwrap_or_default(),
            created_at: record
                .created_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_default(),
            completed_at: record.completed_at.as_deref().and_then(parse_timestamp),
            status: record
                .status
                .as_deref()
                .and_then(QuestStatus::parse)
                .unwrap_or(QuestStatus::Active),
            original_title: record.original_title.unwrap_or_default(),
            duration_minutes: record
                .duration_minutes
                .unwrap_or(DEFAULT_DURATION_MINUTES),
        }
    }
}

/// A start or end time as it appears in calendar payloads: either a bare
/// ISO-8601 string or a Google Calendar `{"dateTime": ...}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Instant(String),
    Calendar {
        #[serde(rename = "dateTime", default)]
        date_time: Option<String>,
    },
    /// Anything else. Kept so a strange timestamp never rejects the event.
    Unrecognized(serde_json::Value),
}

impl EventTime {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Instant(s) => Some(s),
            Self::Calendar { date_time } => date_time.as_deref(),
            Self::Unrecognized(_) => None,
        }
    }
}

/// A raw calendar event or task, the input to quest synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "summary")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl CalendarEvent {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_span(mut self, start: &str, end: &str) -> Self {
        self.start = Some(EventTime::Instant(start.to_string()));
        self.end = Some(EventTime::Instant(end.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_quest(difficulty: Difficulty) -> Quest {
        Quest::new(NewQuest {
            id: "quest_1".to_string(),
            name: "The Sync Summit".to_string(),
            description: "Voices echo.".to_string(),
            category: Category::Meeting,
            difficulty,
            source: "google_calendar".to_string(),
            source_id: "evt".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            original_title: "Weekly Sync".to_string(),
            duration_minutes: 45,
        })
    }

    #[test]
    fn reward_and_boss_follow_difficulty() {
        let easy = sample_quest(Difficulty::Easy);
        assert_eq!(easy.xp_reward(), 25);
        assert!(!easy.is_boss());

        let boss = sample_quest(Difficulty::Boss);
        assert_eq!(boss.xp_reward(), 250);
        assert!(boss.is_boss());
        assert_eq!(boss.status(), QuestStatus::Active);
        assert!(boss.completed_at().is_none());
    }

    #[test]
    fn category_order_is_precedence_order() {
        assert!(Category::Coding < Category::Meeting);
        assert!(Category::Research < Category::Misc);
        assert_eq!(Category::Writing.index(), 2);
        assert_eq!(Category::parse("Exercise"), Some(Category::Exercise));
        assert_eq!(Category::parse("knitting"), None);
    }

    #[test]
    fn quest_serializes_snake_case() {
        let value = serde_json::to_value(sample_quest(Difficulty::Medium)).unwrap();
        assert_eq!(value["difficulty"], "medium");
        assert_eq!(value["category"], "meeting");
        assert_eq!(value["status"], "active");
        assert_eq!(value["xp_reward"], 50);
        assert_eq!(value["is_boss"], false);
        assert!(value["completed_at"].is_null());
    }

    #[test]
    fn record_defaults_fill_missing_fields() {
        let quest: Quest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(quest.name(), "Unknown Quest");
        assert_eq!(quest.difficulty(), Difficulty::Easy);
        assert_eq!(quest.xp_reward(), 25);
        assert_eq!(quest.category(), Category::Misc);
        assert_eq!(quest.status(), QuestStatus::Active);
        assert_eq!(quest.duration_minutes(), DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn record_reward_is_honored_and_boss_flag_derived() {
        let quest: Quest = serde_json::from_value(json!({
            "name": "Dragon Hunt",
            "difficulty": "boss",
            "xp_reward": 10,
            "is_boss": false,
            "category": "unknown-thing",
        }))
        .unwrap();
        assert_eq!(quest.xp_reward(), 10);
        assert!(quest.is_boss());
        assert_eq!(quest.category(), Category::Misc);
    }

    #[test]
    fn record_reward_defaults_from_difficulty() {
        let quest: Quest = serde_json::from_value(json!({"difficulty": "hard"})).unwrap();
        assert_eq!(quest.xp_reward(), 100);
    }

    #[test]
    fn record_rejects_non_numeric_reward() {
        let result: Result<Quest, _> = serde_json::from_value(json!({"xp_reward": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn quest_survives_serialization_round_trip() {
        let mut quest = sample_quest(Difficulty::Hard);
        quest.complete(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap());
        let value = serde_json::to_value(&quest).unwrap();
        let back: Quest = serde_json::from_value(value).unwrap();
        assert_eq!(back, quest);
    }

    #[test]
    fn event_time_shapes() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "summary": "Standup",
            "start": {"dateTime": "2024-03-01T09:00:00Z"},
            "end": "2024-03-01T09:15:00Z",
        }))
        .unwrap();
        assert_eq!(event.title.as_deref(), Some("Standup"));
        assert_eq!(
            event.start.as_ref().and_then(EventTime::as_str),
            Some("2024-03-01T09:00:00Z")
        );
        assert_eq!(
            event.end.as_ref().and_then(EventTime::as_str),
            Some("2024-03-01T09:15:00Z")
        );
    }

    #[test]
    fn odd_event_time_does_not_reject_event() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "title": "Gym",
            "start": 12345,
            "end": {"date": "2024-03-01"},
        }))
        .unwrap();
        assert_eq!(event.start.as_ref().and_then(EventTime::as_str), None);
        assert_eq!(event.end.as_ref().and_then(EventTime::as_str), None);
    }
}
