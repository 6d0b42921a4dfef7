//! Request extractors: authentication, role checks, and the per-request context.

pub mod auth;
pub mod context;
pub mod rbac;
