/// Keyword classification of free text into quest categories and boss types.
///
/// Both classifications are ordered rule tables evaluated top-down with
/// case-folded substring containment; the first matching rule wins.
use tracing::debug;

use crate::schema::encounter::BossType;
use crate::schema::quest::Category;

/// Category rules, in precedence order.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Coding,
        &[
            "code",
            "programming",
            "development",
            "debug",
            "refactor",
            "commit",
            "pull request",
            "merge",
            "review",
        ],
    ),
    (
        Category::Meeting,
        &[
            "meeting",
            "call",
            "sync",
            "standup",
            "review",
            "discussion",
            "interview",
            "presentation",
        ],
    ),
    (
        Category::Writing,
        &[
            "write",
            "document",
            "email",
            "report",
            "blog",
            "documentation",
            "proposal",
        ],
    ),
    (
        Category::Exercise,
        &[
            "gym", "workout", "run", "exercise", "fitness", "yoga", "sports", "training",
        ],
    ),
    (
        Category::Research,
        &[
            "research",
            "study",
            "learn",
            "read",
            "investigate",
            "analysis",
            "explore",
        ],
    ),
];

/// Title overrides for boss types, checked before the category default.
pub const BOSS_TITLE_RULES: &[(BossType, &[&str])] = &[
    (BossType::DeadlineDragon, &["dragon", "deadline"]),
    (BossType::CodeLich, &["code", "refactor", "legacy"]),
    (
        BossType::BureaucracyBehemoth,
        &["bureaucracy", "admin", "compliance"],
    ),
    (
        BossType::PresentationPhoenix,
        &["presentation", "meeting", "review"],
    ),
];

fn first_match<T: Copy>(text: &str, rules: &[(T, &[&str])]) -> Option<T> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(result, _)| *result)
}

/// Classify an event by its title and description.
pub fn categorize(title: &str, description: &str) -> Category {
    let text = format!("{} {}", title, description).to_lowercase();
    let category = first_match(&text, CATEGORY_RULES).unwrap_or(Category::Misc);
    debug!(title, category = category.name(), "categorized event");
    category
}

/// Default boss for a category when no title keyword decides.
pub fn default_boss(category: Category) -> BossType {
    match category {
        Category::Coding => BossType::CodeLich,
        Category::Meeting => BossType::PresentationPhoenix,
        Category::Writing => BossType::DocumentationDemon,
        Category::Exercise => BossType::EnduranceTitan,
        Category::Research => BossType::KnowledgeDevourer,
        Category::Misc => BossType::ChaosEntity,
    }
}

/// Boss type from title keywords, falling back to the category table.
pub fn boss_type(category: Category, title: &str) -> BossType {
    first_match(&title.to_lowercase(), BOSS_TITLE_RULES).unwrap_or_else(|| default_boss(category))
}
