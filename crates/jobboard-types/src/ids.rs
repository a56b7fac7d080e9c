//! Type-safe identifier wrappers around the `SERIAL` primary keys.
//!
//! Every table has an auto-incrementing `INTEGER` key. Wrapping each one in
//! its own newtype keeps a [`JobId`] from being passed where a
//! [`CompanyId`] is expected, which matters most for the junction table
//! where both appear side by side.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `i32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Return the inner key value.
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Primary key of a row in `users`.
    UserId
}

define_id! {
    /// Primary key of a row in `jobs`.
    JobId
}

define_id! {
    /// Primary key of a row in `companies`.
    CompanyId
}

define_id! {
    /// Primary key of a row in the `jobs_to_companies` junction table.
    LinkId
}

define_id! {
    /// Primary key of a row in the detached `some_table`.
    CharacterId
}
