//! Member data model.
//!
//! Field newtypes can only be built through the validators in
//! [`crate::domain::validation`], so holding a [`MemberName`],
//! [`EmailAddress`] or [`PhoneNumber`] proves the value is normalised.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::error::MemberError;
use super::validation::{validate_email, validate_name, validate_phone};

/// Store-assigned member identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub(in crate::domain) fn from_normalized(value: String) -> Self {
                Self(value)
            }

            /// Borrow the normalised value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

validated_string! {
    /// Trimmed member name, 2 to 100 characters.
    MemberName
}

validated_string! {
    /// Trimmed, lower-cased email address.
    EmailAddress
}

validated_string! {
    /// Trimmed phone number with the caller's formatting preserved.
    PhoneNumber
}

/// Persisted member.
///
/// ## Invariants
/// - `id` never changes once assigned by the store.
/// - `email` is unique across all members.
/// - `phone`, when present, is unique across all members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Member {
    #[schema(value_type = i64, example = 1)]
    id: MemberId,
    #[schema(value_type = String, example = "John Doe")]
    name: MemberName,
    #[schema(value_type = String, example = "john@example.com")]
    email: EmailAddress,
    #[schema(value_type = Option<String>, example = "+1-234-567-8901")]
    phone: Option<PhoneNumber>,
}

impl Member {
    /// Attach a store-assigned identifier to a validated draft.
    pub fn new(id: MemberId, member: NewMember) -> Self {
        let NewMember { name, email, phone } = member;
        Self {
            id,
            name,
            email,
            phone,
        }
    }

    /// Rebuild a member from stored column values, re-checking every field.
    ///
    /// Adapters use this when loading rows so corrupt data surfaces as an
    /// error rather than as a member that breaks the invariants.
    pub fn from_stored(
        id: i64,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Self, MemberError> {
        Ok(Self {
            id: MemberId::new(id),
            name: validate_name(name)?,
            email: validate_email(email)?,
            phone: validate_phone(phone)?,
        })
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &MemberName {
        &self.name
    }

    /// Unique, lower-cased email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Unique phone number, if recorded.
    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Copy of this member with the supplied changes applied.
    pub fn with_changes(&self, changes: &MemberChanges) -> Self {
        let mut updated = self.clone();
        if let Some(name) = &changes.name {
            updated.name = name.clone();
        }
        if let Some(email) = &changes.email {
            updated.email = email.clone();
        }
        if let Some(phone) = &changes.phone {
            updated.phone = phone.clone();
        }
        updated
    }
}

/// Validated member that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    /// Validated name.
    pub name: MemberName,
    /// Validated email address.
    pub email: EmailAddress,
    /// Validated phone number, if any.
    pub phone: Option<PhoneNumber>,
}

/// Validated partial update.
///
/// `None` leaves a field untouched. For `phone`, `Some(None)` clears the
/// stored number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberChanges {
    /// Replacement name.
    pub name: Option<MemberName>,
    /// Replacement email address.
    pub email: Option<EmailAddress>,
    /// Replacement phone; `Some(None)` clears it.
    pub phone: Option<Option<PhoneNumber>>,
}

impl MemberChanges {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Raw input for creating a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    /// Name as typed.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Phone as typed, if supplied.
    pub phone: Option<String>,
}

impl MemberDraft {
    /// Draft without a phone number.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Attach a raw phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Raw input for a partial update; only `Some` fields are considered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    /// New name as typed.
    pub name: Option<String>,
    /// New email as typed.
    pub email: Option<String>,
    /// New phone as typed; blank clears the stored number.
    pub phone: Option<String>,
}

impl MemberPatch {
    /// Set the raw name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the raw email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the raw phone.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[cfg(test)]
mod tests {
    //! Construction and partial-update coverage for the member model.

    use super::*;
    use crate::domain::error::MemberField;
    use crate::domain::validation::validate_all;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn member() -> Member {
        let draft = validate_all("John Doe", "john@example.com", Some("+1-234-567-8901"))
            .expect("valid draft");
        Member::new(MemberId::new(7), draft)
    }

    #[rstest]
    fn serialises_flat_json(member: Member) {
        let value = serde_json::to_value(&member).expect("serialise member");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "John Doe",
                "email": "john@example.com",
                "phone": "+1-234-567-8901",
            })
        );
    }

    #[rstest]
    fn with_changes_only_touches_supplied_fields(member: Member) {
        let changes = MemberChanges {
            name: Some(MemberName::from_normalized("Jane Doe".to_owned())),
            ..MemberChanges::default()
        };

        let updated = member.with_changes(&changes);

        assert_eq!(updated.id(), member.id());
        assert_eq!(updated.name().as_str(), "Jane Doe");
        assert_eq!(updated.email(), member.email());
        assert_eq!(updated.phone(), member.phone());
    }

    #[rstest]
    fn with_changes_can_clear_the_phone(member: Member) {
        let changes = MemberChanges {
            phone: Some(None),
            ..MemberChanges::default()
        };

        assert!(member.with_changes(&changes).phone().is_none());
    }

    #[rstest]
    fn from_stored_rejects_corrupt_rows() {
        let err = Member::from_stored(1, "Jo", "not-an-email", None).expect_err("bad email");
        assert_eq!(err.field(), Some(MemberField::Email));
    }

    #[rstest]
    fn empty_changes_are_detected() {
        assert!(MemberChanges::default().is_empty());
        let changes = MemberChanges {
            phone: Some(None),
            ..MemberChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
