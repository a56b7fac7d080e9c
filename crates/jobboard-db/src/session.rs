//! Unit of work over a single `PostgreSQL` transaction.
//!
//! A [`Session`] owns one pooled connection with an open transaction. The
//! per-table stores it hands out all run on that transaction, so either
//! everything done through a session is committed together or none of it
//! is. Dropping a session without calling [`Session::commit`] rolls back.

use sqlx::{PgPool, Postgres, Transaction};

use crate::company_store::CompanyStore;
use crate::error::DbError;
use crate::job_store::JobStore;
use crate::link_store::LinkStore;
use crate::schema::Schema;
use crate::user_store::UserStore;

/// An open transaction plus the schema its stores operate on.
pub struct Session {
    tx: Transaction<'static, Postgres>,
    schema: Schema,
}

impl Session {
    /// Acquire a connection from the pool and begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if no connection is available or `BEGIN` fails.
    pub async fn begin(pool: &PgPool, schema: Schema) -> Result<Self, DbError> {
        let tx = pool.begin().await?;
        tracing::debug!(schema = schema.name(), "Session opened");
        Ok(Self { tx, schema })
    }

    /// Operations on `users` within this session.
    pub fn users(&mut self) -> UserStore<'_> {
        UserStore::new(&mut self.tx, &self.schema)
    }

    /// Operations on `jobs` within this session.
    pub fn jobs(&mut self) -> JobStore<'_> {
        JobStore::new(&mut self.tx, &self.schema)
    }

    /// Operations on `companies` within this session.
    pub fn companies(&mut self) -> CompanyStore<'_> {
        CompanyStore::new(&mut self.tx, &self.schema)
    }

    /// Operations on the `jobs_to_companies` junction table within this session.
    pub fn links(&mut self) -> LinkStore<'_> {
        LinkStore::new(&mut self.tx, &self.schema)
    }

    /// The schema this session operates on.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Commit everything done in this session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `COMMIT` fails; the work is lost then.
    pub async fn commit(self) -> Result<(), DbError> {
        self.tx.commit().await?;
        tracing::debug!("Session committed");
        Ok(())
    }

    /// Discard everything done in this session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `ROLLBACK` fails.
    pub async fn rollback(self) -> Result<(), DbError> {
        self.tx.rollback().await?;
        tracing::debug!("Session rolled back");
        Ok(())
    }
}
