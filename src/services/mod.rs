//! Business logic over the store. Catalog services take the request's
//! connection so that all work of one request shares its transaction.

pub mod auth;
pub mod finding_template;
pub mod solution;
pub mod translation;
