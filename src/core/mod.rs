pub mod classifier;
pub mod clock;
pub mod encounter;
pub mod pipeline;
pub mod progression;
pub mod resolver;
pub mod selector;
pub mod synthesizer;
pub mod templates;
