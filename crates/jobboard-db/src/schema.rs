//! Table definitions, creation, and teardown.
//!
//! The schema is declared once here as DDL text and applied at runtime with
//! `CREATE ... IF NOT EXISTS`, so [`Schema::create_all`] is safe to call on
//! every start. Statement rendering is kept pure so it can be checked
//! without a server.
//!
//! ```text
//! jobs <--job_id-- users
//!  ^
//!  +--job_id-- jobs_to_companies --company_id--> companies
//! ```

use sqlx::PgPool;

use crate::error::DbError;

/// Name of the users table.
pub const USERS: &str = "users";
/// Name of the jobs table.
pub const JOBS: &str = "jobs";
/// Name of the companies table.
pub const COMPANIES: &str = "companies";
/// Name of the junction table linking jobs and companies.
pub const JOBS_TO_COMPANIES: &str = "jobs_to_companies";
/// Name of the detached demo table.
pub const SOME_TABLE: &str = "some_table";

/// The four related tables, in creation order.
pub const TABLES: [&str; 4] = [JOBS, COMPANIES, USERS, JOBS_TO_COMPANIES];

/// Default schema name.
pub const DEFAULT_SCHEMA: &str = "public";

/// Longest identifier `PostgreSQL` keeps without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// What happens to junction rows when the job or company they point at is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete the junction rows along with the parent.
    #[default]
    Cascade,
    /// Refuse to delete a parent that still has junction rows.
    Restrict,
}

impl OnDelete {
    /// The SQL referential action.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
        }
    }
}

impl core::str::FromStr for OnDelete {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "restrict" => Ok(Self::Restrict),
            other => Err(DbError::Config(format!(
                "unknown on-delete action: {other} (expected cascade or restrict)"
            ))),
        }
    }
}

/// Number of rows in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    /// Unqualified table name.
    pub table: &'static str,
    /// Row count at query time.
    pub rows: i64,
}

/// A named `PostgreSQL` schema holding the jobboard tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    link_on_delete: OnDelete,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            name: DEFAULT_SCHEMA.to_owned(),
            link_on_delete: OnDelete::default(),
        }
    }
}

impl Schema {
    /// Create a schema handle for the given name.
    ///
    /// The name is spliced into DDL, so only lowercase ASCII letters, digits,
    /// and underscores are accepted, and it must not start with a digit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the name is not a plain identifier.
    pub fn new(name: &str) -> Result<Self, DbError> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
            return Err(DbError::Config(format!("invalid schema name: {name:?}")));
        }
        Ok(Self {
            name: name.to_owned(),
            link_on_delete: OnDelete::default(),
        })
    }

    /// Set the referential action on the junction table's foreign keys.
    #[must_use]
    pub const fn with_link_on_delete(mut self, on_delete: OnDelete) -> Self {
        self.link_on_delete = on_delete;
        self
    }

    /// The schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referential action applied to junction rows.
    pub const fn link_on_delete(&self) -> OnDelete {
        self.link_on_delete
    }

    /// Qualify a table name with this schema.
    pub fn qualified(&self, table: &str) -> String {
        format!("{}.{table}", self.name)
    }

    /// Ordered DDL that creates every table, index, and comment.
    pub fn create_statements(&self) -> Vec<String> {
        let s = &self.name;
        let on_delete = self.link_on_delete.as_sql();
        vec![
            format!("CREATE SCHEMA IF NOT EXISTS {s}"),
            format!(
                "CREATE TABLE IF NOT EXISTS {s}.{JOBS} (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL
                )"
            ),
            format!("CREATE UNIQUE INDEX IF NOT EXISTS ix_{s}_{JOBS}_name ON {s}.{JOBS} (name)"),
            format!(
                "CREATE TABLE IF NOT EXISTS {s}.{COMPANIES} (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL
                )"
            ),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS ix_{s}_{COMPANIES}_name ON {s}.{COMPANIES} (name)"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {s}.{USERS} (
                    id SERIAL PRIMARY KEY,
                    username VARCHAR(64) NOT NULL,
                    job_id INTEGER,
                    CONSTRAINT fk_{s}_user_job FOREIGN KEY (job_id)
                        REFERENCES {s}.{JOBS} (id) ON DELETE SET NULL
                )"
            ),
            format!("CREATE INDEX IF NOT EXISTS ix_{s}_{USERS}_username ON {s}.{USERS} (username)"),
            format!("COMMENT ON TABLE {s}.{USERS} IS 'Users of our app'"),
            format!(
                "COMMENT ON COLUMN {s}.{USERS}.id IS 'Unique identifier for the user. Also known as user id.'"
            ),
            format!(
                "COMMENT ON COLUMN {s}.{USERS}.username IS 'The namely identifier of the user.'"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {s}.{JOBS_TO_COMPANIES} (
                    id SERIAL PRIMARY KEY,
                    company_id INTEGER NOT NULL,
                    job_id INTEGER NOT NULL
                )"
            ),
            // Re-applied on every run so an existing table picks up the
            // configured referential action.
            format!(
                "ALTER TABLE {s}.{JOBS_TO_COMPANIES}
                    DROP CONSTRAINT IF EXISTS fk_{s}_company,
                    DROP CONSTRAINT IF EXISTS fk_{s}_job,
                    ADD CONSTRAINT fk_{s}_company FOREIGN KEY (company_id)
                        REFERENCES {s}.{COMPANIES} (id) ON DELETE {on_delete},
                    ADD CONSTRAINT fk_{s}_job FOREIGN KEY (job_id)
                        REFERENCES {s}.{JOBS} (id) ON DELETE {on_delete}"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS ix_{s}_{JOBS_TO_COMPANIES}_job_id ON {s}.{JOBS_TO_COMPANIES} (job_id)"
            ),
        ]
    }

    /// DDL that drops every table, dependents first.
    pub fn drop_statements(&self) -> Vec<String> {
        TABLES
            .iter()
            .rev()
            .map(|table| format!("DROP TABLE IF EXISTS {}.{table}", self.name))
            .collect()
    }

    /// Create every table that does not exist yet, and (re)apply the
    /// junction table's foreign keys with the current [`OnDelete`] action.
    ///
    /// All statements run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement fails; nothing is created then.
    pub async fn create_all(&self, pool: &PgPool) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;
        for statement in self.create_statements() {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::info!(
            schema = %self.name,
            link_on_delete = self.link_on_delete.as_sql(),
            "Created tables"
        );
        Ok(())
    }

    /// Drop every table this schema defines.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any drop fails; nothing is dropped then.
    pub async fn drop_all(&self, pool: &PgPool) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;
        for statement in self.drop_statements() {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::info!(schema = %self.name, "Dropped tables");
        Ok(())
    }

    /// List which of the four tables currently exist, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the catalog query fails.
    pub async fn existing_tables(&self, pool: &PgPool) -> Result<Vec<&'static str>, DbError> {
        let names: Vec<String> = TABLES.iter().map(|t| (*t).to_owned()).collect();
        let found: Vec<(String,)> = sqlx::query_as(
            r"SELECT table_name::TEXT
              FROM information_schema.tables
              WHERE table_schema = $1 AND table_name::TEXT = ANY($2)",
        )
        .bind(&self.name)
        .bind(&names)
        .fetch_all(pool)
        .await?;

        Ok(TABLES
            .iter()
            .copied()
            .filter(|table| found.iter().any(|(name,)| name == table))
            .collect())
    }

    /// Count the rows of each of the four tables.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a table is missing or a count fails.
    pub async fn row_counts(&self, pool: &PgPool) -> Result<Vec<TableCount>, DbError> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let (rows,): (i64,) =
                sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.qualified(table)))
                    .fetch_one(pool)
                    .await?;
            counts.push(TableCount { table, rows });
        }
        Ok(counts)
    }

    /// DDL for the detached `some_table`.
    pub fn some_table_statement(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {}.{SOME_TABLE} (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                birth_date DATE
            )",
            self.name
        )
    }

    /// Create the detached `some_table` (and its schema) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a statement fails.
    pub async fn create_some_table(&self, pool: &PgPool) -> Result<(), DbError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", self.name))
            .execute(pool)
            .await?;
        sqlx::query(&self.some_table_statement())
            .execute(pool)
            .await?;
        tracing::info!(schema = %self.name, table = SOME_TABLE, "Created table");
        Ok(())
    }

    /// Drop the detached `some_table`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the statement fails.
    pub async fn drop_some_table(&self, pool: &PgPool) -> Result<(), DbError> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.qualified(SOME_TABLE)))
            .execute(pool)
            .await?;
        tracing::info!(schema = %self.name, table = SOME_TABLE, "Dropped table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_name_validation() {
        assert!(Schema::new("public").is_ok());
        assert!(Schema::new("job_board_2").is_ok());
        assert!(Schema::new("_scratch").is_ok());
        assert!(Schema::new("").is_err());
        assert!(Schema::new("2fast").is_err());
        assert!(Schema::new("Public").is_err());
        assert!(Schema::new("public; DROP TABLE users").is_err());
        assert!(Schema::new(&"a".repeat(64)).is_err());
    }

    #[test]
    fn on_delete_parsing() {
        assert_eq!("cascade".parse::<OnDelete>().ok(), Some(OnDelete::Cascade));
        assert_eq!("RESTRICT".parse::<OnDelete>().ok(), Some(OnDelete::Restrict));
        assert!("set null".parse::<OnDelete>().is_err());
    }

    #[test]
    fn create_statements_order_parents_before_children() {
        let statements = Schema::default().create_statements();
        let position = |needle: &str| statements.iter().position(|s| s.contains(needle));

        let jobs = position("CREATE TABLE IF NOT EXISTS public.jobs");
        let companies = position("CREATE TABLE IF NOT EXISTS public.companies");
        let users = position("CREATE TABLE IF NOT EXISTS public.users");
        let links = position("CREATE TABLE IF NOT EXISTS public.jobs_to_companies");

        assert!(jobs.is_some() && companies.is_some());
        assert!(jobs < users);
        assert!(jobs < links);
        assert!(companies < links);
    }

    #[test]
    fn create_statements_carry_constraint_names() {
        let ddl = Schema::default().create_statements().join("\n");
        assert!(ddl.contains("CONSTRAINT fk_public_user_job FOREIGN KEY (job_id)"));
        assert!(ddl.contains("ADD CONSTRAINT fk_public_company FOREIGN KEY (company_id)"));
        assert!(ddl.contains("ADD CONSTRAINT fk_public_job FOREIGN KEY (job_id)"));
        assert!(ddl.contains("ix_public_jobs_name"));
        assert!(ddl.contains("ix_public_companies_name"));
        assert!(ddl.contains("'Users of our app'"));
    }

    #[test]
    fn link_on_delete_is_rendered() {
        let cascade = Schema::default().create_statements().join("\n");
        assert_eq!(cascade.matches("ON DELETE CASCADE").count(), 2);
        assert!(cascade.contains("ON DELETE SET NULL"));

        let restrict = Schema::default()
            .with_link_on_delete(OnDelete::Restrict)
            .create_statements()
            .join("\n");
        assert_eq!(restrict.matches("ON DELETE RESTRICT").count(), 2);
        assert!(!restrict.contains("CASCADE"));
    }

    #[test]
    fn junction_foreign_keys_are_replaced_after_table_creation() {
        let statements = Schema::default()
            .with_link_on_delete(OnDelete::Restrict)
            .create_statements();
        let create = statements
            .iter()
            .position(|s| s.contains("CREATE TABLE IF NOT EXISTS public.jobs_to_companies"));
        let alter = statements
            .iter()
            .position(|s| s.starts_with("ALTER TABLE public.jobs_to_companies"));
        assert!(create.is_some() && alter.is_some());
        assert!(create < alter);

        let alter_sql = alter.and_then(|i| statements.get(i)).cloned().unwrap_or_default();
        let drop_company = alter_sql.find("DROP CONSTRAINT IF EXISTS fk_public_company");
        let add_company = alter_sql.find("ADD CONSTRAINT fk_public_company");
        assert!(drop_company.is_some() && drop_company < add_company);
        assert!(alter_sql.contains("DROP CONSTRAINT IF EXISTS fk_public_job"));
        assert_eq!(alter_sql.matches("ON DELETE RESTRICT").count(), 2);

        let junction_create = create.and_then(|i| statements.get(i)).cloned().unwrap_or_default();
        assert!(!junction_create.contains("FOREIGN KEY"));
    }

    #[test]
    fn drop_statements_reverse_creation_order() {
        let drops = Schema::new("hr").map(|s| s.drop_statements()).ok();
        assert_eq!(
            drops,
            Some(vec![
                "DROP TABLE IF EXISTS hr.jobs_to_companies".to_owned(),
                "DROP TABLE IF EXISTS hr.users".to_owned(),
                "DROP TABLE IF EXISTS hr.companies".to_owned(),
                "DROP TABLE IF EXISTS hr.jobs".to_owned(),
            ])
        );
    }

    #[test]
    fn some_table_statement_columns() {
        let ddl = Schema::default().some_table_statement();
        assert!(ddl.contains("public.some_table"));
        assert!(ddl.contains("name VARCHAR(100) NOT NULL"));
        assert!(ddl.contains("birth_date DATE"));
    }
}
