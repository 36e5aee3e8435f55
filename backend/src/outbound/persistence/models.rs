//! Internal Diesel row structs for the `members` table.
//!
//! These types never leave the persistence layer; rows are converted to
//! domain [`Member`] values through [`Member::from_stored`], which re-checks
//! every field.

use diesel::prelude::*;

use crate::domain::{Member, MemberChanges, MemberError, NewMember};

use super::schema::members;

/// Row struct for reading from the members table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl TryFrom<MemberRow> for Member {
    type Error = MemberError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Member::from_stored(row.id, &row.name, &row.email, row.phone.as_deref())
    }
}

/// Insertable struct for creating member rows; `id` comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = members)]
pub(crate) struct NewMemberRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

impl<'a> From<&'a NewMember> for NewMemberRow<'a> {
    fn from(member: &'a NewMember) -> Self {
        Self {
            name: member.name.as_str(),
            email: member.email.as_str(),
            phone: member.phone.as_ref().map(AsRef::as_ref),
        }
    }
}

/// Changeset for partial updates.
///
/// `None` columns are skipped. `phone: Some(None)` writes `NULL`.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = members)]
pub(crate) struct MemberChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
}

impl MemberChangeset<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

impl<'a> From<&'a MemberChanges> for MemberChangeset<'a> {
    fn from(changes: &'a MemberChanges) -> Self {
        Self {
            name: changes.name.as_ref().map(AsRef::as_ref),
            email: changes.email.as_ref().map(AsRef::as_ref),
            phone: changes
                .phone
                .as_ref()
                .map(|phone| phone.as_ref().map(AsRef::as_ref)),
        }
    }
}
