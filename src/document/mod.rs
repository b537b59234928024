//! Document composer: layouts, pagination, PDF serialization and delivery.

pub mod assets;
pub mod content;
pub mod delivery;
pub mod fields;
pub mod format;
pub mod generators;
pub mod handlers;
pub mod layout;
pub mod pdf;
pub mod text;
