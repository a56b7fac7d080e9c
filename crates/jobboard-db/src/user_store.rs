//! Operations on the `users` table.
//!
//! A user references at most one job through the nullable `job_id` foreign
//! key. Reassigning or clearing that reference is the typical update.

use jobboard_types::{Job, JobId, User, UserId};
use sqlx::PgConnection;

use crate::error::DbError;
use crate::job_store::JobRow;
use crate::schema::{JOBS, Schema, USERS};

/// Operations on the `users` table, bound to one connection.
pub struct UserStore<'a> {
    conn: &'a mut PgConnection,
    schema: &'a Schema,
}

impl<'a> UserStore<'a> {
    /// Create a user store bound to a connection (usually a session's transaction).
    pub const fn new(conn: &'a mut PgConnection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Insert a user, optionally already holding a job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if `job` does not exist.
    pub async fn insert(&mut self, username: &str, job: Option<JobId>) -> Result<User, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO {} (username, job_id) VALUES ($1, $2) RETURNING id, username, job_id",
            self.schema.qualified(USERS)
        ))
        .bind(username)
        .bind(job.map(JobId::into_inner))
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(user_id = row.id, username, "Inserted user");
        Ok(row.into())
    }

    /// Fetch a user by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: UserId) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT id, username, job_id FROM {} WHERE id = $1",
            self.schema.qualified(USERS)
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(User::from))
    }

    /// Fetch a user that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no user has this key.
    pub async fn require(&mut self, id: UserId) -> Result<User, DbError> {
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found(USERS, id))
    }

    /// All users with the given username. Usernames are not unique.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_username(&mut self, username: &str) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT id, username, job_id FROM {} WHERE username = $1 ORDER BY id",
            self.schema.qualified(USERS)
        ))
        .bind(username)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// All users, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT id, username, job_id FROM {} ORDER BY id",
            self.schema.qualified(USERS)
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Point a user at a different job, or clear the job with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the user does not exist, or
    /// [`DbError::ConstraintViolation`] if the job does not exist.
    pub async fn assign_job(&mut self, id: UserId, job: Option<JobId>) -> Result<User, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE {} SET job_id = $2 WHERE id = $1 RETURNING id, username, job_id",
            self.schema.qualified(USERS)
        ))
        .bind(id.into_inner())
        .bind(job.map(JobId::into_inner))
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found(USERS, id))?;

        tracing::debug!(user_id = row.id, job_id = ?row.job_id, "Reassigned user job");
        Ok(row.into())
    }

    /// Change a user's name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the user does not exist.
    pub async fn rename(&mut self, id: UserId, username: &str) -> Result<User, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE {} SET username = $2 WHERE id = $1 RETURNING id, username, job_id",
            self.schema.qualified(USERS)
        ))
        .bind(id.into_inner())
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found(USERS, id))?;

        tracing::debug!(user_id = row.id, username, "Renamed user");
        Ok(row.into())
    }

    /// Delete a user. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&mut self, id: UserId) -> Result<bool, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            self.schema.qualified(USERS)
        ))
        .bind(id.into_inner())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The job a user holds, following the `job_id` reference.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the user does not exist.
    pub async fn job_of(&mut self, id: UserId) -> Result<Option<Job>, DbError> {
        let user = self.require(id).await?;
        let Some(job_id) = user.job_id else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT id, name FROM {} WHERE id = $1",
            self.schema.qualified(JOBS)
        ))
        .bind(job_id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Job::from))
    }
}

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub job_id: Option<i32>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
            job_id: row.job_id.map(JobId),
        }
    }
}
