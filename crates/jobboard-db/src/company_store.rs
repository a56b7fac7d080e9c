//! Operations on the `companies` table.

use jobboard_types::{Company, CompanyId, Job};
use sqlx::PgConnection;

use crate::error::DbError;
use crate::job_store::JobRow;
use crate::schema::{COMPANIES, JOBS, JOBS_TO_COMPANIES, Schema};

/// Operations on the `companies` table, bound to one connection.
pub struct CompanyStore<'a> {
    conn: &'a mut PgConnection,
    schema: &'a Schema,
}

impl<'a> CompanyStore<'a> {
    /// Create a company store bound to a connection (usually a session's transaction).
    pub const fn new(conn: &'a mut PgConnection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Insert a company.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the name is taken.
    pub async fn insert(&mut self, name: &str) -> Result<Company, DbError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            self.schema.qualified(COMPANIES)
        ))
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(company_id = row.id, name, "Inserted company");
        Ok(row.into())
    }

    /// Insert several companies in one statement. Keys follow input order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if any name is taken.
    pub async fn insert_many(&mut self, names: &[&str]) -> Result<Vec<Company>, DbError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = names.iter().map(|name| (*name).to_owned()).collect();
        let mut rows = sqlx::query_as::<_, CompanyRow>(&format!(
            r"INSERT INTO {} (name)
              SELECT name FROM UNNEST($1::TEXT[]) WITH ORDINALITY AS input(name, ord)
              ORDER BY ord
              RETURNING id, name",
            self.schema.qualified(COMPANIES)
        ))
        .bind(&names)
        .fetch_all(&mut *self.conn)
        .await?;
        rows.sort_by_key(|row| row.id);

        tracing::debug!(count = rows.len(), "Inserted companies (batch UNNEST)");
        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Fetch a company by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: CompanyId) -> Result<Option<Company>, DbError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT id, name FROM {} WHERE id = $1",
            self.schema.qualified(COMPANIES)
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Company::from))
    }

    /// Fetch a company by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_name(&mut self, name: &str) -> Result<Option<Company>, DbError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT id, name FROM {} WHERE name = $1",
            self.schema.qualified(COMPANIES)
        ))
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Company::from))
    }

    /// All companies, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self) -> Result<Vec<Company>, DbError> {
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT id, name FROM {} ORDER BY id",
            self.schema.qualified(COMPANIES)
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Delete a company. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if junction rows still
    /// reference the company under a restrict policy.
    pub async fn delete(&mut self, id: CompanyId) -> Result<bool, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            self.schema.qualified(COMPANIES)
        ))
        .bind(id.into_inner())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Jobs this company offers, through the junction table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn jobs_of(&mut self, id: CompanyId) -> Result<Vec<Job>, DbError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            r"SELECT j.id, j.name
              FROM {jobs} j
              JOIN {links} l ON l.job_id = j.id
              WHERE l.company_id = $1
              ORDER BY j.id",
            jobs = self.schema.qualified(JOBS),
            links = self.schema.qualified(JOBS_TO_COMPANIES),
        ))
        .bind(id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Job::from).collect())
    }
}

/// A row from the `companies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CompanyRow {
    pub id: i32,
    pub name: String,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: CompanyId(row.id),
            name: row.name,
        }
    }
}
