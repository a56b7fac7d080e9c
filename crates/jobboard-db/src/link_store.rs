//! Operations on the `jobs_to_companies` junction table.
//!
//! Each row pairs one company with one job. The pairings are what
//! [`CompanyStore::jobs_of`](crate::CompanyStore::jobs_of) and
//! [`JobStore::companies_of`](crate::JobStore::companies_of) walk.

use jobboard_types::{CompanyId, CompanyJobLink, JobId, LinkId};
use sqlx::PgConnection;

use crate::error::DbError;
use crate::schema::{JOBS_TO_COMPANIES, Schema};

/// Operations on the junction table, bound to one connection.
pub struct LinkStore<'a> {
    conn: &'a mut PgConnection,
    schema: &'a Schema,
}

impl<'a> LinkStore<'a> {
    /// Create a link store bound to a connection (usually a session's transaction).
    pub const fn new(conn: &'a mut PgConnection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Pair a company with a job.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if either side does not exist.
    pub async fn link(
        &mut self,
        company: CompanyId,
        job: JobId,
    ) -> Result<CompanyJobLink, DbError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO {} (company_id, job_id) VALUES ($1, $2) RETURNING id, company_id, job_id",
            self.schema.qualified(JOBS_TO_COMPANIES)
        ))
        .bind(company.into_inner())
        .bind(job.into_inner())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(company_id = %company, job_id = %job, "Linked company and job");
        Ok(row.into())
    }

    /// Insert several pairings in one statement.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if any side does not exist;
    /// no pairing is inserted then.
    pub async fn link_many(
        &mut self,
        pairs: &[(CompanyId, JobId)],
    ) -> Result<Vec<CompanyJobLink>, DbError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let (company_ids, job_ids): (Vec<i32>, Vec<i32>) = pairs
            .iter()
            .map(|(company, job)| (company.into_inner(), job.into_inner()))
            .unzip();

        let mut rows = sqlx::query_as::<_, LinkRow>(&format!(
            r"INSERT INTO {} (company_id, job_id)
              SELECT company_id, job_id
              FROM UNNEST($1::INTEGER[], $2::INTEGER[]) WITH ORDINALITY AS input(company_id, job_id, ord)
              ORDER BY ord
              RETURNING id, company_id, job_id",
            self.schema.qualified(JOBS_TO_COMPANIES)
        ))
        .bind(&company_ids)
        .bind(&job_ids)
        .fetch_all(&mut *self.conn)
        .await?;
        rows.sort_by_key(|row| row.id);

        tracing::debug!(count = rows.len(), "Inserted junction rows (batch UNNEST)");
        Ok(rows.into_iter().map(CompanyJobLink::from).collect())
    }

    /// Remove every pairing of this company with this job.
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn unlink(&mut self, company: CompanyId, job: JobId) -> Result<u64, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE company_id = $1 AND job_id = $2",
            self.schema.qualified(JOBS_TO_COMPANIES)
        ))
        .bind(company.into_inner())
        .bind(job.into_inner())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// All junction rows, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self) -> Result<Vec<CompanyJobLink>, DbError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT id, company_id, job_id FROM {} ORDER BY id",
            self.schema.qualified(JOBS_TO_COMPANIES)
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(CompanyJobLink::from).collect())
    }
}

/// A row from the `jobs_to_companies` table.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
struct LinkRow {
    id: i32,
    company_id: i32,
    job_id: i32,
}

impl From<LinkRow> for CompanyJobLink {
    fn from(row: LinkRow) -> Self {
        Self {
            id: LinkId(row.id),
            company_id: CompanyId(row.company_id),
            job_id: JobId(row.job_id),
        }
    }
}
