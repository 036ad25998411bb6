pub mod character;
pub mod encounter;
pub mod quest;
pub mod resolution;
