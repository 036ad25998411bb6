/// Template pools: parsing, RON loading, validation and seeded rendering.
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::selector::{self, SelectorError};
use crate::schema::encounter::{BossType, RollTier};
use crate::schema::quest::{Category, Difficulty};

/// Template pools shipped with the crate.
pub const BUILTIN_TEMPLATES: &str = include_str!("../../quest_data/templates.ron");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    TemplateParse(String),
    #[error("template slot '{0}' has no binding")]
    UnboundSlot(String),
    #[error("template pool not found: {0}")]
    PoolNotFound(String),
    #[error("invalid template set: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A value filled in at render time: `{task}`.
    Slot(String),
}

/// A parsed template: a sequence of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

/// Slot values for one render.
pub type Bindings = FxHashMap<&'static str, String>;

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{name}` → `Slot`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::TemplateParse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }

                if end == len {
                    return Err(TemplateError::TemplateParse("unclosed brace".to_string()));
                }

                let name: String = chars[start..end].iter().collect();
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::TemplateParse("empty braces".to_string()));
                }

                segments.push(TemplateSegment::Slot(name.to_string()));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::TemplateParse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    /// Names of every slot used, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            TemplateSegment::Slot(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Fill every slot from `bindings`.
    pub fn render(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(name) => {
                    let value = bindings
                        .get(name.as_str())
                        .ok_or_else(|| TemplateError::UnboundSlot(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// A pool of interchangeable templates; one is chosen per seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatePool {
    pub entries: Vec<Template>,
}

impl TemplatePool {
    /// The template chosen for `seed`.
    pub fn pick(&self, seed: &str) -> Result<&Template, TemplateError> {
        Ok(selector::pick(seed, &self.entries)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pool key layout.
pub mod keys {
    use super::*;

    pub const LEVEL_UP: &str = "level_up";
    pub const ENCOUNTER_SUMMARY: &str = "encounter.summary";
    pub const FINAL_VICTORY: &str = "phase3.victory";
    pub const GENERIC_BOSS: &str = "generic";

    pub fn quest_name(category: Category) -> String {
        format!("quest_name.{}", category.name())
    }

    pub fn flavor(category: Category) -> String {
        format!("flavor.{}", category.name())
    }

    pub fn victory(difficulty: Difficulty) -> String {
        format!("victory.{}", difficulty.name())
    }

    /// Narration pool for one phase. `boss` is a boss type key or
    /// [`GENERIC_BOSS`].
    pub fn phase_narration(phase: u8, boss: &str) -> String {
        format!("phase{}.{}", phase, boss)
    }

    pub fn phase_roll(phase: u8, tier: RollTier) -> String {
        format!("phase{}.roll.{}", phase, tier.key())
    }

    pub fn phase_challenge(phase: u8) -> String {
        format!("phase{}.challenge", phase)
    }
}

/// Number of phases in every boss encounter.
pub const PHASE_COUNT: u8 = 3;

const NAME_SLOTS: &[&str] = &["task"];
const VICTORY_SLOTS: &[&str] = &["xp", "quest"];
const LEVEL_UP_SLOTS: &[&str] = &["level", "title", "class"];
const PHASE_SLOTS: &[&str] = &["boss", "quest"];
const FINAL_VICTORY_SLOTS: &[&str] = &["boss", "xp"];
const SUMMARY_SLOTS: &[&str] = &["boss", "difficulty"];

/// Every pool a complete template set must provide, with the slots each
/// may use.
pub fn required_pools() -> Vec<(String, &'static [&'static str])> {
    let mut pools = Vec::new();
    for category in Category::ALL {
        pools.push((keys::quest_name(category), NAME_SLOTS));
        pools.push((keys::flavor(category), NAME_SLOTS));
    }
    for difficulty in Difficulty::ALL {
        pools.push((keys::victory(difficulty), VICTORY_SLOTS));
    }
    pools.push((keys::LEVEL_UP.to_string(), LEVEL_UP_SLOTS));
    for phase in 1..=PHASE_COUNT {
        pools.push((keys::phase_narration(phase, keys::GENERIC_BOSS), PHASE_SLOTS));
        pools.push((keys::phase_challenge(phase), PHASE_SLOTS));
        for tier in [RollTier::Critical, RollTier::Neutral, RollTier::Setback] {
            pools.push((keys::phase_roll(phase, tier), PHASE_SLOTS));
        }
    }
    pools.push((keys::FINAL_VICTORY.to_string(), FINAL_VICTORY_SLOTS));
    pools.push((keys::ENCOUNTER_SUMMARY.to_string(), SUMMARY_SLOTS));
    pools
}

/// Boss-specific narration pools. None are required: a missing one falls
/// back to the generic pool of the same phase.
pub fn optional_pools() -> Vec<(String, &'static [&'static str])> {
    let mut pools = Vec::new();
    for phase in 1..=PHASE_COUNT {
        for boss in BossType::ALL {
            pools.push((keys::phase_narration(phase, boss.key()), PHASE_SLOTS));
        }
    }
    pools
}

/// Outcome of checking a template set.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A named set of template pools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSet {
    pub pools: FxHashMap<String, TemplatePool>,
}

// RON shape: `{ "key": Pool(entries: ["...", ...]) }`. Entries are raw
// strings on disk and parsed templates in memory.
#[derive(Debug, Deserialize)]
#[serde(rename = "Pool")]
struct RonPool {
    entries: Vec<String>,
}

impl TemplateSet {
    /// The embedded default pools.
    pub fn builtin() -> Result<TemplateSet, TemplateError> {
        Self::parse_ron(BUILTIN_TEMPLATES)
    }

    /// Load a template set from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<TemplateSet, TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a template set from a RON string.
    pub fn parse_ron(input: &str) -> Result<TemplateSet, TemplateError> {
        let raw: FxHashMap<String, RonPool> = ron::from_str(input)?;
        let mut pools = FxHashMap::default();

        for (key, ron_pool) in raw {
            let entries = ron_pool
                .entries
                .iter()
                .map(|text| Template::parse(text))
                .collect::<Result<Vec<_>, _>>()?;
            pools.insert(key, TemplatePool { entries });
        }

        Ok(TemplateSet { pools })
    }

    /// Merge another set into this one. Pools from `other` replace pools
    /// in `self` with the same key.
    pub fn merge(&mut self, other: TemplateSet) {
        for (key, pool) in other.pools {
            self.pools.insert(key, pool);
        }
    }

    pub fn pool(&self, key: &str) -> Result<&TemplatePool, TemplateError> {
        self.pools
            .get(key)
            .ok_or_else(|| TemplateError::PoolNotFound(key.to_string()))
    }

    /// `key` if present, otherwise `fallback`.
    pub fn pool_or(&self, key: &str, fallback: &str) -> Result<&TemplatePool, TemplateError> {
        match self.pools.get(key) {
            Some(pool) => Ok(pool),
            None => self.pool(fallback),
        }
    }

    /// Pick from pool `key` by `seed` and render with `bindings`.
    pub fn render(&self, key: &str, seed: &str, bindings: &Bindings) -> Result<String, TemplateError> {
        self.pool(key)?.pick(seed)?.render(bindings)
    }

    /// Check pool coverage and slot usage.
    pub fn lint(&self) -> LintReport {
        let mut report = LintReport::default();
        let mut known: FxHashSet<&str> = FxHashSet::default();

        let required = required_pools();
        let optional = optional_pools();

        for (key, allowed) in &required {
            known.insert(key.as_str());
            match self.pools.get(key) {
                None => report.errors.push(format!("missing pool '{}'", key)),
                Some(pool) => check_pool(key, pool, allowed, &mut report),
            }
        }

        for (key, allowed) in &optional {
            known.insert(key.as_str());
            if let Some(pool) = self.pools.get(key) {
                check_pool(key, pool, allowed, &mut report);
            }
        }

        let mut extra: Vec<&String> = self
            .pools
            .keys()
            .filter(|k| !known.contains(k.as_str()))
            .collect();
        extra.sort();
        for key in extra {
            report.warnings.push(format!("pool '{}' is never used", key));
        }

        report
    }

    /// Fail unless [`lint`](Self::lint) reports no errors.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let report = self.lint();
        if report.is_clean() {
            Ok(())
        } else {
            Err(TemplateError::Invalid(report.errors))
        }
    }
}

fn check_pool(key: &str, pool: &TemplatePool, allowed: &[&str], report: &mut LintReport) {
    if pool.is_empty() {
        report.errors.push(format!("pool '{}' is empty", key));
        return;
    }
    for (i, template) in pool.entries.iter().enumerate() {
        for slot in template.slots() {
            if !allowed.contains(&slot) {
                report.errors.push(format!(
                    "pool '{}' entry {} uses unknown slot '{{{}}}'",
                    key, i, slot
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&'static str, &str)]) -> Bindings {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn parse_literal_only() {
        let t = Template::parse("Hello, world.").unwrap();
        assert_eq!(
            t.segments,
            vec![TemplateSegment::Literal("Hello, world.".to_string())]
        );
    }

    #[test]
    fn parse_slot() {
        let t = Template::parse("The {task} Protocol").unwrap();
        assert_eq!(t.segments.len(), 3);
        assert_eq!(t.segments[1], TemplateSegment::Slot("task".to_string()));
        assert_eq!(t.slots().collect::<Vec<_>>(), vec!["task"]);
    }

    #[test]
    fn parse_escaped_braces() {
        let t = Template::parse("Use {{braces}} here.").unwrap();
        assert_eq!(
            t.segments,
            vec![TemplateSegment::Literal("Use {braces} here.".to_string())]
        );
    }

    #[test]
    fn parse_errors() {
        assert!(Template::parse("Bad {} here").is_err());
        assert!(Template::parse("Bad {outer{inner}} here").is_err());
        assert!(Template::parse("Bad {unclosed here").is_err());
        assert!(Template::parse("Bad } here").is_err());
    }

    #[test]
    fn render_fills_slots() {
        let t = Template::parse("+{xp} XP for {quest}.").unwrap();
        let out = t
            .render(&bindings(&[("xp", "50"), ("quest", "The Sync Summit")]))
            .unwrap();
        assert_eq!(out, "+50 XP for The Sync Summit.");
    }

    #[test]
    fn render_reports_unbound_slot() {
        let t = Template::parse("Hello {name}").unwrap();
        assert!(matches!(
            t.render(&Bindings::default()),
            Err(TemplateError::UnboundSlot(name)) if name == "name"
        ));
    }

    #[test]
    fn pool_pick_is_seeded() {
        let pool = TemplatePool {
            entries: ["a", "b", "c", "d", "e"]
                .iter()
                .map(|s| Template::parse(s).unwrap())
                .collect(),
        };
        // digest("abc") % 5 == 4
        let picked = pool.pick("abc").unwrap().render(&Bindings::default()).unwrap();
        assert_eq!(picked, "e");
        assert!(TemplatePool::default().pick("abc").is_err());
    }

    #[test]
    fn parse_ron_pools() {
        let set = TemplateSet::parse_ron(
            r#"{
                "quest_name.misc": Pool(entries: ["The {task} Quest", "The {task} Journey"]),
                "level_up": Pool(entries: ["Level {level}!"]),
            }"#,
        )
        .unwrap();
        assert_eq!(set.pools.len(), 2);
        assert_eq!(set.pool("quest_name.misc").unwrap().len(), 2);
        assert!(matches!(
            set.pool("nope"),
            Err(TemplateError::PoolNotFound(_))
        ));
    }

    #[test]
    fn parse_ron_rejects_bad_template() {
        let result = TemplateSet::parse_ron(r#"{ "level_up": Pool(entries: ["Level {level"]) }"#);
        assert!(matches!(result, Err(TemplateError::TemplateParse(_))));
    }

    #[test]
    fn merge_precedence() {
        let mut base = TemplateSet::parse_ron(
            r#"{
                "shared": Pool(entries: ["base version"]),
                "base_only": Pool(entries: ["only in base"]),
            }"#,
        )
        .unwrap();
        let overrides =
            TemplateSet::parse_ron(r#"{ "shared": Pool(entries: ["override", "second"]) }"#)
                .unwrap();
        base.merge(overrides);

        assert_eq!(base.pool("shared").unwrap().len(), 2);
        assert!(base.pools.contains_key("base_only"));
    }

    #[test]
    fn pool_or_falls_back() {
        let set = TemplateSet::parse_ron(r#"{ "phase1.generic": Pool(entries: ["x"]) }"#).unwrap();
        assert!(set.pool_or("phase1.code_lich", "phase1.generic").is_ok());
        assert!(set.pool_or("phase1.code_lich", "phase2.generic").is_err());
    }

    #[test]
    fn builtin_set_is_valid() {
        let set = TemplateSet::builtin().unwrap();
        let report = set.lint();
        assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
        set.validate().unwrap();
    }

    #[test]
    fn lint_finds_missing_empty_and_unknown_slots() {
        let set = TemplateSet::parse_ron(
            r#"{
                "quest_name.coding": Pool(entries: ["The {task} of {realm}"]),
                "flavor.coding": Pool(entries: []),
                "stray": Pool(entries: ["unused"]),
            }"#,
        )
        .unwrap();
        let report = set.lint();
        assert!(report.errors.iter().any(|e| e.contains("'{realm}'")));
        assert!(report.errors.iter().any(|e| e == "pool 'flavor.coding' is empty"));
        assert!(report.errors.iter().any(|e| e == "missing pool 'level_up'"));
        assert_eq!(report.warnings, vec!["pool 'stray' is never used".to_string()]);
        assert!(matches!(set.validate(), Err(TemplateError::Invalid(_))));
    }
}
