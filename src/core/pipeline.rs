/// The quest engine: event → quest, quest → resolution, quest → encounter.
///
/// Holds the validated template set and the clock; every operation takes
/// `&self` and leaves the engine untouched, so one engine can serve any
/// number of callers.
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::core::clock::{Clock, SystemClock};
use crate::core::encounter;
use crate::core::resolver;
use crate::core::synthesizer;
use crate::core::templates::{TemplateError, TemplateSet};
use crate::schema::character::CharacterSheet;
use crate::schema::encounter::Encounter;
use crate::schema::quest::{CalendarEvent, Quest};
use crate::schema::resolution::Resolution;

/// Provenance label used when none is configured.
pub const DEFAULT_SOURCE: &str = "google_calendar";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The top-level quest engine. Built via `QuestEngine::builder()`.
pub struct QuestEngine {
    templates: TemplateSet,
    clock: Arc<dyn Clock>,
    source: String,
}

/// Builder for constructing a `QuestEngine`.
pub struct QuestEngineBuilder {
    templates_dir: Option<String>,
    source: String,
    clock: Option<Arc<dyn Clock>>,
    /// Directly provided templates (for testing without files).
    templates: Option<TemplateSet>,
}

impl QuestEngine {
    pub fn builder() -> QuestEngineBuilder {
        QuestEngineBuilder {
            templates_dir: None,
            source: DEFAULT_SOURCE.to_string(),
            clock: None,
            templates: None,
        }
    }

    /// Turn one calendar event into an active quest stamped with the
    /// engine clock's current time.
    pub fn synthesize(&self, event: &CalendarEvent) -> Result<Quest, EngineError> {
        let quest = synthesizer::synthesize(event, &self.templates, self.clock.now(), &self.source)?;
        Ok(quest)
    }

    /// Synthesize every event, in order.
    pub fn synthesize_all(&self, events: &[CalendarEvent]) -> Result<Vec<Quest>, EngineError> {
        events.iter().map(|event| self.synthesize(event)).collect()
    }

    /// Complete `quest` for the character in `sheet`. `history` holds the
    /// quests completed before this one.
    pub fn resolve(
        &self,
        quest: &Quest,
        sheet: &CharacterSheet,
        history: &[Quest],
    ) -> Result<Resolution, EngineError> {
        let resolution = resolver::resolve(quest, sheet, history, &self.templates, self.clock.now())?;
        Ok(resolution)
    }

    /// Three-phase encounter for `quest` at the level in `sheet`.
    pub fn generate_encounter(
        &self,
        quest: &Quest,
        sheet: &CharacterSheet,
    ) -> Result<Encounter, EngineError> {
        let encounter = encounter::generate_encounter(quest, sheet, &self.templates)?;
        Ok(encounter)
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl QuestEngineBuilder {
    /// Directory of `.ron` template files merged over the built-in set.
    pub fn templates_dir(mut self, path: &str) -> Self {
        self.templates_dir = Some(path.to_string());
        self
    }

    /// Provide templates directly (for testing without files). Replaces
    /// the built-in set; `templates_dir` still merges on top.
    pub fn templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Provenance label recorded on synthesized quests.
    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn build(self) -> Result<QuestEngine, EngineError> {
        if self.source.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "source label must not be empty".to_string(),
            ));
        }

        let mut templates = match self.templates {
            Some(templates) => templates,
            None => TemplateSet::builtin()?,
        };

        // Directory files override built-in pools
        if let Some(ref dir) = self.templates_dir {
            if Path::new(dir).exists() {
                load_ron_files_from_dir(dir, |path| {
                    debug!(path = %path.display(), "loading template file");
                    let set = TemplateSet::load_from_ron(path)?;
                    templates.merge(set);
                    Ok(())
                })?;
            }
        }

        templates.validate()?;

        Ok(QuestEngine {
            templates,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            source: self.source,
        })
    }
}

/// Load all .ron files from a directory in file-name order, calling
/// `loader` for each.
fn load_ron_files_from_dir<F>(dir: &str, mut loader: F) -> Result<(), EngineError>
where
    F: FnMut(&Path) -> Result<(), EngineError>,
{
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in paths {
        loader(&path)?;
    }
    Ok(())
}
