//! Quest Engine: calendar events as role-playing quests.
//!
//! Turns calendar events into quests, resolves completed quests into XP,
//! levels, stats and classes, and narrates three-phase boss encounters.
//! Every piece of text is picked from RON template pools by a seeded
//! digest, so the same inputs always tell the same story.

pub mod adapter;
pub mod core;
pub mod schema;

pub use crate::core::clock::{Clock, FixedClock, SystemClock};
pub use crate::core::pipeline::{EngineError, QuestEngine, QuestEngineBuilder};
