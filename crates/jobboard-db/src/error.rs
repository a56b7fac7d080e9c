//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`]. Database errors raised by
//! `PostgreSQL` are classified on the way in, so callers can tell a
//! constraint violation (duplicate name, dangling foreign key) apart from a
//! lost connection without string matching.

/// The kind of integrity constraint a statement violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A `UNIQUE` or primary key constraint (`SQLSTATE 23505`).
    Unique,
    /// A `FOREIGN KEY` constraint (`SQLSTATE 23503`).
    ForeignKey,
    /// A `NOT NULL` constraint (`SQLSTATE 23502`).
    NotNull,
    /// A `CHECK` constraint (`SQLSTATE 23514`).
    Check,
}

impl ConstraintKind {
    /// Classify a `PostgreSQL` `SQLSTATE` code.
    ///
    /// Returns `None` for codes outside the integrity-constraint class.
    pub fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Unique),
            "23503" => Some(Self::ForeignKey),
            "23502" => Some(Self::NotNull),
            "23514" => Some(Self::Check),
            _ => None,
        }
    }
}

impl core::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not null",
            Self::Check => "check",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed for a reason not classified below.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[source] sqlx::Error),

    /// The database could not be reached, or the pool is unusable.
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement violated an integrity constraint.
    #[error("{kind} constraint violated{}: {message}", constraint_suffix(.constraint.as_deref()))]
    ConstraintViolation {
        /// Which class of constraint failed.
        kind: ConstraintKind,
        /// The constraint name reported by the server, if any.
        constraint: Option<String>,
        /// The server's error message.
        message: String,
    },

    /// A row that was required to exist was not found.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The table or entity that was searched.
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Build a [`DbError::NotFound`] for the given entity and key.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Return the constraint kind if this is a constraint violation.
    pub const fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Render the optional constraint name for error messages.
fn constraint_suffix(constraint: Option<&str>) -> String {
    constraint.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
        ) {
            return Self::Connection(err.to_string());
        }

        if let sqlx::Error::Database(ref db_err) = err {
            let kind = db_err
                .code()
                .as_deref()
                .and_then(ConstraintKind::from_sqlstate);
            if let Some(kind) = kind {
                return Self::ConstraintViolation {
                    kind,
                    constraint: db_err.constraint().map(str::to_owned),
                    message: db_err.message().to_owned(),
                };
            }
        }

        Self::Postgres(err)
    }
}
