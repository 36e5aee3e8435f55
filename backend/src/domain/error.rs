//! Domain error taxonomy for the member directory.
//!
//! Every failure leaving the service facade is one of the four
//! [`MemberError`] kinds. The variants carry structured fields so adapters can
//! match on the kind and the offending field without parsing messages.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::member::MemberId;

/// Member attribute named by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberField {
    /// Store-assigned identifier.
    Id,
    /// Display name.
    Name,
    /// Email address.
    Email,
    /// Optional phone number.
    Phone,
}

impl MemberField {
    /// Lower-case field name as used in payloads and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for MemberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldViolation {
    /// No value was supplied.
    Required,
    /// The value is only whitespace.
    Empty,
    /// Fewer characters than allowed after trimming.
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// More characters than allowed after trimming.
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Characters outside the permitted set.
    InvalidCharacters,
    /// Does not match the `local@domain.tld` shape.
    InvalidFormat,
    /// Contains `..`.
    ConsecutiveDots,
    /// Starts or ends with `.`.
    LeadingOrTrailingDot,
    /// Too few digits once formatting is stripped.
    TooFewDigits {
        /// Minimum digit count.
        min: usize,
    },
    /// Too many digits once formatting is stripped.
    TooManyDigits {
        /// Maximum digit count.
        max: usize,
    },
}

impl FieldViolation {
    /// Human-readable sentence describing this violation on `field`.
    ///
    /// # Examples
    /// ```
    /// use member_directory::domain::{FieldViolation, MemberField};
    ///
    /// assert_eq!(
    ///     FieldViolation::TooShort { min: 8 }.message(MemberField::Name),
    ///     "Name must be at least 8 characters long"
    /// );
    /// assert_eq!(
    ///     FieldViolation::TooFewDigits { min: 8 }.message(MemberField::Phone),
    ///     "Phone number is too short"
    /// );
    /// ```
    pub fn message(self, field: MemberField) -> String {
        let subject = match field {
            MemberField::Id => "Id",
            MemberField::Name => "Name",
            MemberField::Email => "Email",
            MemberField::Phone => "Phone number",
        };
        match (self, field) {
            (Self::Required, _) => format!("{subject} is required"),
            (Self::Empty, MemberField::Name) => format!("{subject} cannot be empty or only whitespace"),
            (Self::Empty, _) => format!("{subject} cannot be empty"),
            (Self::TooShort { min }, _) => format!("{subject} must be at least {min} characters long"),
            (Self::TooLong { .. }, MemberField::Email) => "Email address is too long".to_owned(),
            (Self::TooLong { .. } | Self::TooManyDigits { .. }, MemberField::Phone) => {
                format!("{subject} is too long")
            }
            (Self::TooLong { max }, _) => format!("{subject} cannot exceed {max} characters"),
            (Self::InvalidCharacters, _) => format!("{subject} contains invalid characters"),
            (Self::InvalidFormat, _) => format!("Invalid {field} format"),
            (Self::ConsecutiveDots, _) => format!("{subject} cannot contain consecutive dots"),
            (Self::LeadingOrTrailingDot, _) => format!("{subject} cannot start or end with a dot"),
            (Self::TooFewDigits { .. }, _) => format!("{subject} is too short"),
            (Self::TooManyDigits { max }, _) => {
                format!("{subject} cannot contain more than {max} digits")
            }
        }
    }
}

fn describe_violation(field: &MemberField, reason: &FieldViolation) -> String {
    reason.message(*field)
}

/// Failure surfaced by the member directory core.
///
/// - `InvalidField` and `AlreadyExists` are raised before any write.
/// - `NotFound` names the identifier that matched nothing.
/// - `Store` wraps unexpected persistence failures; `detail` is for logs and
///   must not be shown to external callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberError {
    /// A field failed validation.
    #[error("Invalid {field}: {}", describe_violation(.field, .reason))]
    InvalidField {
        /// Field that failed.
        field: MemberField,
        /// Raw input as supplied.
        value: String,
        /// Rule the input broke.
        reason: FieldViolation,
    },
    /// Another member already holds the value.
    #[error("Member with {field} '{value}' already exists")]
    AlreadyExists {
        /// Unique field in conflict.
        field: MemberField,
        /// Normalised value already taken.
        value: String,
    },
    /// No member matched the lookup.
    #[error("Member with {field} '{value}' not found")]
    NotFound {
        /// Field used for the lookup.
        field: MemberField,
        /// Value that matched nothing.
        value: String,
    },
    /// The store failed unexpectedly.
    #[error("Database operation failed: {operation}: {detail}")]
    Store {
        /// Service operation that was running.
        operation: &'static str,
        /// Store diagnostic, for logs only.
        detail: String,
    },
}

impl MemberError {
    /// Validation failure for `field` with the raw input that caused it.
    pub fn invalid_field(
        field: MemberField,
        value: impl Into<String>,
        reason: FieldViolation,
    ) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
            reason,
        }
    }

    /// Uniqueness conflict on `field`.
    pub fn already_exists(field: MemberField, value: impl Into<String>) -> Self {
        Self::AlreadyExists {
            field,
            value: value.into(),
        }
    }

    /// No member carries the given identifier.
    pub fn member_not_found(id: MemberId) -> Self {
        Self::NotFound {
            field: MemberField::Id,
            value: id.to_string(),
        }
    }

    /// Unexpected persistence failure during `operation`.
    pub fn store(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Store {
            operation,
            detail: detail.into(),
        }
    }

    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<MemberField> {
        match self {
            Self::InvalidField { field, .. }
            | Self::AlreadyExists { field, .. }
            | Self::NotFound { field, .. } => Some(*field),
            Self::Store { .. } => None,
        }
    }
}
