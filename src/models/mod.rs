//! Database models and DTOs for the finding template catalog and its users.

pub mod finding_template;
pub mod language;
pub mod solution;
pub mod translation;
pub mod user;
