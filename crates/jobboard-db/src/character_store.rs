//! Statement-at-a-time operations on the detached `some_table`.
//!
//! Unlike the session-bound stores, every call here borrows a connection
//! from the pool, runs one statement in autocommit mode, and hands the
//! connection back. Two read paths are offered: a typed select through
//! [`sqlx::FromRow`], and a raw text query whose columns are pulled out by
//! name.

use chrono::NaiveDate;
use jobboard_types::{Character, CharacterId, NewCharacter};
use sqlx::{PgPool, Row};

use crate::error::DbError;
use crate::schema::{SOME_TABLE, Schema};

/// Operations on `some_table`.
pub struct CharacterStore<'a> {
    pool: &'a PgPool,
    schema: &'a Schema,
}

impl<'a> CharacterStore<'a> {
    /// Create a character store bound to a connection pool.
    pub const fn new(pool: &'a PgPool, schema: &'a Schema) -> Self {
        Self { pool, schema }
    }

    /// Select every row with a typed query.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn select_all(&self) -> Result<Vec<Character>, DbError> {
        let rows = sqlx::query_as::<_, CharacterRow>(&format!(
            "SELECT id, name, birth_date FROM {} ORDER BY id",
            self.schema.qualified(SOME_TABLE)
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Character::from).collect())
    }

    /// Select every row with raw text SQL, reading columns by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails or a column is
    /// missing or mistyped.
    pub async fn select_all_raw(&self) -> Result<Vec<Character>, DbError> {
        let rows = sqlx::query(&format!(
            "select * from {}",
            self.schema.qualified(SOME_TABLE)
        ))
        .fetch_all(self.pool)
        .await?;

        let mut characters = Vec::with_capacity(rows.len());
        for row in rows {
            characters.push(Character {
                id: CharacterId(row.try_get("id")?),
                name: row.try_get("name")?,
                birth_date: row.try_get("birth_date")?,
            });
        }
        Ok(characters)
    }

    /// Insert one character.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(
        &self,
        name: &str,
        birth_date: Option<NaiveDate>,
    ) -> Result<Character, DbError> {
        let row = sqlx::query_as::<_, CharacterRow>(&format!(
            "INSERT INTO {} (name, birth_date) VALUES ($1, $2) RETURNING id, name, birth_date",
            self.schema.qualified(SOME_TABLE)
        ))
        .bind(name)
        .bind(birth_date)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(character_id = row.id, name, "Inserted character");
        Ok(row.into())
    }

    /// Bulk-insert characters in one statement. Returns the number inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_many(&self, characters: &[NewCharacter]) -> Result<u64, DbError> {
        if characters.is_empty() {
            return Ok(0);
        }

        let (names, dates): (Vec<String>, Vec<Option<NaiveDate>>) = characters
            .iter()
            .map(|c| (c.name.clone(), c.birth_date))
            .unzip();

        let result = sqlx::query(&format!(
            r"INSERT INTO {} (name, birth_date)
              SELECT * FROM UNNEST($1::TEXT[], $2::DATE[])",
            self.schema.qualified(SOME_TABLE)
        ))
        .bind(&names)
        .bind(&dates)
        .execute(self.pool)
        .await?;

        tracing::debug!(count = result.rows_affected(), "Inserted characters (batch UNNEST)");
        Ok(result.rows_affected())
    }

    /// Rename every character called `from`. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn rename(&self, from: &str, to: &str) -> Result<u64, DbError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET name = $2 WHERE name = $1",
            self.schema.qualified(SOME_TABLE)
        ))
        .bind(from)
        .bind(to)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete every character called `name`. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete_by_name(&self, name: &str) -> Result<u64, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE name = $1",
            self.schema.qualified(SOME_TABLE)
        ))
        .bind(name)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// A row from `some_table`.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CharacterRow {
    id: i32,
    name: String,
    birth_date: Option<NaiveDate>,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: CharacterId(row.id),
            name: row.name,
            birth_date: row.birth_date,
        }
    }
}
