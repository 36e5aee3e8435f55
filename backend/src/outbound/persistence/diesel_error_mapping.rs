//! Translation of pool and Diesel failures into [`MemberPersistenceError`].
//!
//! Unique violations are attributed to a member field from the constraint
//! name first and the server message second, so the service can report the
//! conflicting field even when it lost a race with a concurrent writer.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::MemberField;
use crate::domain::ports::MemberPersistenceError;

use super::pool::PoolError;

/// Unique constraint guarding `members.email`.
pub(crate) const EMAIL_CONSTRAINT: &str = "members_email_key";
/// Unique constraint guarding `members.phone`.
pub(crate) const PHONE_CONSTRAINT: &str = "members_phone_key";

pub(super) fn map_pool_error(error: PoolError) -> MemberPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MemberPersistenceError::connection(message)
        }
    }
}

/// Field a unique violation refers to, if it can be told.
fn attribute_unique_violation(constraint: Option<&str>, message: &str) -> Option<MemberField> {
    match constraint {
        Some(EMAIL_CONSTRAINT) => return Some(MemberField::Email),
        Some(PHONE_CONSTRAINT) => return Some(MemberField::Phone),
        _ => {}
    }

    let lower = message.to_lowercase();
    match (lower.contains("email"), lower.contains("phone")) {
        (true, false) => Some(MemberField::Email),
        (false, true) => Some(MemberField::Phone),
        _ => None,
    }
}

pub(super) fn map_diesel_error(error: DieselError) -> MemberPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let field = attribute_unique_violation(info.constraint_name(), info.message());
            MemberPersistenceError::unique_violation(field, info.message())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MemberPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => MemberPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => MemberPersistenceError::query("database query error"),
        _ => MemberPersistenceError::query("database error"),
    }
}
