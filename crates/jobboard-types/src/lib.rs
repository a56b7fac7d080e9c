//! Shared type definitions for the jobboard schema.
//!
//! The schema is small: users, jobs, companies, and the junction table that
//! links jobs to companies. A detached `some_table` of cartoon characters is
//! used only by the Core-style walkthrough.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers around the integer primary keys
//! - [`structs`] -- Entity structs mirroring one row of each table

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{CharacterId, CompanyId, JobId, LinkId, UserId};
pub use structs::{Character, Company, CompanyJobLink, Job, NewCharacter, User};
