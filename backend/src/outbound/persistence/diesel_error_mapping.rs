//! Shared Diesel error classification for the blog repositories.
//!
//! Each repository turns a [`DieselFailure`] into its own port error so the
//! domain can tell integrity failures (duplicate slug, missing author) from
//! infrastructure failures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// Any other database or query-building failure.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation,
}

/// Failure while loading rows and turning them into domain values.
#[derive(Debug)]
pub(crate) enum LoadError {
    /// Diesel reported an error.
    Diesel(DieselError),
    /// A stored row failed domain validation.
    Corrupt(String),
}

impl From<DieselError> for LoadError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

/// Classify `error`, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DieselFailure::ForeignKeyViolation
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a [`LoadError`] through a repository's connection and query
/// constructors. Constraint violations cannot occur on reads and are
/// reported as query failures.
pub(crate) fn map_load_error<E>(
    error: LoadError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match error {
        LoadError::Corrupt(message) => query(message),
        LoadError::Diesel(error) => match classify_diesel_error(error) {
            DieselFailure::Connection(message) => connection(message.to_owned()),
            DieselFailure::Query(message) => query(message.to_owned()),
            DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation => {
                query("constraint violation".to_owned())
            }
        },
    }
}
