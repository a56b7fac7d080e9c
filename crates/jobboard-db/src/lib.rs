//! Data layer for the jobboard schema (`PostgreSQL`).
//!
//! Four tables live in one named schema: `users`, `jobs`, `companies`, and
//! the `jobs_to_companies` junction table that carries the many-to-many
//! relationship between jobs and companies. A detached `some_table` backs
//! the Core-style walkthrough.
//!
//! # Architecture
//!
//! ```text
//! PostgresConfig --connect--> PostgresPool (engine)
//!     |
//!     +-- Schema::create_all / drop_all     (DDL)
//!     |
//!     +-- session() --> Session (one transaction, commit or rollback)
//!     |       |-- UserStore
//!     |       |-- JobStore
//!     |       |-- CompanyStore
//!     |       +-- LinkStore
//!     |
//!     +-- CharacterStore (autocommit, some_table)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, credentials
//! - [`schema`] -- Table DDL, creation, drop, and inspection
//! - [`session`] -- Unit of work over a single transaction
//! - [`user_store`], [`job_store`], [`company_store`], [`link_store`] -- Per-table operations
//! - [`character_store`] -- Statement-at-a-time operations on `some_table`
//! - [`error`] -- Shared error types

pub mod character_store;
pub mod company_store;
pub mod error;
pub mod job_store;
pub mod link_store;
pub mod postgres;
pub mod schema;
pub mod session;
pub mod user_store;

// Re-export primary types for convenience.
pub use character_store::CharacterStore;
pub use company_store::CompanyStore;
pub use error::{ConstraintKind, DbError};
pub use job_store::JobStore;
pub use link_store::LinkStore;
pub use postgres::{Credentials, PostgresConfig, PostgresPool};
pub use schema::{OnDelete, Schema, TableCount};
pub use session::Session;
pub use user_store::UserStore;
