//! Operations on the `jobs` table.
//!
//! Jobs sit on both sides of the schema: users point at them through
//! `users.job_id`, and companies reach them through the
//! `jobs_to_companies` junction table.

use jobboard_types::{Company, Job, JobId, User};
use sqlx::PgConnection;

use crate::company_store::CompanyRow;
use crate::error::DbError;
use crate::schema::{COMPANIES, JOBS, JOBS_TO_COMPANIES, Schema, USERS};
use crate::user_store::UserRow;

/// Operations on the `jobs` table, bound to one connection.
pub struct JobStore<'a> {
    conn: &'a mut PgConnection,
    schema: &'a Schema,
}

impl<'a> JobStore<'a> {
    /// Create a job store bound to a connection (usually a session's transaction).
    pub const fn new(conn: &'a mut PgConnection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Insert a job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] with
    /// [`ConstraintKind::Unique`](crate::ConstraintKind::Unique) if the name is taken.
    pub async fn insert(&mut self, name: &str) -> Result<Job, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            self.schema.qualified(JOBS)
        ))
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(job_id = row.id, name, "Inserted job");
        Ok(row.into())
    }

    /// Insert several jobs in one statement. Keys follow input order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if any name is taken; no job
    /// is inserted then.
    pub async fn insert_many(&mut self, names: &[&str]) -> Result<Vec<Job>, DbError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = names.iter().map(|name| (*name).to_owned()).collect();
        let mut rows = sqlx::query_as::<_, JobRow>(&format!(
            r"INSERT INTO {} (name)
              SELECT name FROM UNNEST($1::TEXT[]) WITH ORDINALITY AS input(name, ord)
              ORDER BY ord
              RETURNING id, name",
            self.schema.qualified(JOBS)
        ))
        .bind(&names)
        .fetch_all(&mut *self.conn)
        .await?;
        rows.sort_by_key(|row| row.id);

        tracing::debug!(count = rows.len(), "Inserted jobs (batch UNNEST)");
        Ok(rows.into_iter().map(Job::from).collect())
    }

    /// Fetch a job by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: JobId) -> Result<Option<Job>, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT id, name FROM {} WHERE id = $1",
            self.schema.qualified(JOBS)
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Job::from))
    }

    /// Fetch a job by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_name(&mut self, name: &str) -> Result<Option<Job>, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT id, name FROM {} WHERE name = $1",
            self.schema.qualified(JOBS)
        ))
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Job::from))
    }

    /// All jobs, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self) -> Result<Vec<Job>, DbError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT id, name FROM {} ORDER BY id",
            self.schema.qualified(JOBS)
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Job::from).collect())
    }

    /// Rename a job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the job does not exist, or
    /// [`DbError::ConstraintViolation`] if the new name is taken.
    pub async fn rename(&mut self, id: JobId, name: &str) -> Result<Job, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            self.schema.qualified(JOBS)
        ))
        .bind(id.into_inner())
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found(JOBS, id))?;

        Ok(row.into())
    }

    /// Delete a job. Returns whether a row was removed.
    ///
    /// Users holding the job are left unemployed. Junction rows are removed
    /// or block the delete, depending on the schema's
    /// [`OnDelete`](crate::OnDelete) policy.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] with
    /// [`ConstraintKind::ForeignKey`](crate::ConstraintKind::ForeignKey) if
    /// junction rows still reference the job under a restrict policy.
    pub async fn delete(&mut self, id: JobId) -> Result<bool, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            self.schema.qualified(JOBS)
        ))
        .bind(id.into_inner())
        .execute(&mut *self.conn)
        .await?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(job_id = %id, deleted, "Deleted job");
        Ok(deleted)
    }

    /// Companies offering this job, through the junction table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn companies_of(&mut self, id: JobId) -> Result<Vec<Company>, DbError> {
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            r"SELECT c.id, c.name
              FROM {companies} c
              JOIN {links} l ON l.company_id = c.id
              WHERE l.job_id = $1
              ORDER BY c.id",
            companies = self.schema.qualified(COMPANIES),
            links = self.schema.qualified(JOBS_TO_COMPANIES),
        ))
        .bind(id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Users currently holding this job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn users_of(&mut self, id: JobId) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT id, username, job_id FROM {} WHERE job_id = $1 ORDER BY id",
            self.schema.qualified(USERS)
        ))
        .bind(id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

/// A row from the `jobs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct JobRow {
    pub id: i32,
    pub name: String,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Self {
            id: JobId(row.id),
            name: row.name,
        }
    }
}
