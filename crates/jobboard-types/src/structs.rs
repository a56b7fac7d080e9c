//! Entity structs for the jobboard schema.
//!
//! Each struct mirrors one row of its table. The database crate converts its
//! raw `FromRow` rows into these, so nothing outside the data layer deals in
//! bare integers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, CompanyId, JobId, LinkId, UserId};

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A user of the app. A user may hold at most one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// The namely identifier of the user.
    pub username: String,
    /// The job this user currently holds, if any.
    pub job_id: Option<JobId>,
}

impl core::fmt::Display for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.job_id {
            Some(job) => write!(f, "User#{} {} (job #{job})", self.id, self.username),
            None => write!(f, "User#{} {} (unemployed)", self.id, self.username),
        }
    }
}

// ---------------------------------------------------------------------------
// jobs / companies
// ---------------------------------------------------------------------------

/// A job title. Names are unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Primary key.
    pub id: JobId,
    /// Unique job title.
    pub name: String,
}

/// A company. Names are unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Primary key.
    pub id: CompanyId,
    /// Unique company name.
    pub name: String,
}

/// One row of the `jobs_to_companies` junction table.
///
/// Each row pairs exactly one company with exactly one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyJobLink {
    /// Primary key of the junction row.
    pub id: LinkId,
    /// The linked company.
    pub company_id: CompanyId,
    /// The linked job.
    pub job_id: JobId,
}

// ---------------------------------------------------------------------------
// some_table
// ---------------------------------------------------------------------------

/// A row of the detached `some_table` used by the Core-style walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Primary key.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
    /// Birth date, when known.
    pub birth_date: Option<NaiveDate>,
}

impl core::fmt::Display for Character {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.birth_date {
            Some(date) => write!(f, "({}, '{}', {date})", self.id, self.name),
            None => write!(f, "({}, '{}', None)", self.id, self.name),
        }
    }
}

/// Values for inserting a new [`Character`]; the key is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    /// Character name.
    pub name: String,
    /// Birth date, when known.
    pub birth_date: Option<NaiveDate>,
}

impl NewCharacter {
    /// Build a new character row.
    pub fn new(name: &str, birth_date: Option<NaiveDate>) -> Self {
        Self {
            name: name.to_owned(),
            birth_date,
        }
    }
}
