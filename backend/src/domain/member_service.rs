//! Member directory service.
//!
//! Implements the [`MemberDirectory`] driving port by sequencing validation,
//! the uniqueness pre-check and the repository write for each operation. The
//! pre-check only produces friendly field-specific errors; a unique violation
//! reported by the store at write time is still mapped to `AlreadyExists`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{MemberDirectory, MemberPersistenceError, MemberRepository};
use crate::domain::validation::{validate_all, validate_changes};
use crate::domain::{
    EmailAddress, Member, MemberDraft, MemberError, MemberField, MemberId, MemberPatch,
    PhoneNumber,
};

/// Upper bound applied to every `list` page size.
pub const MAX_LIST_LIMIT: u64 = 100;

fn store_error(operation: &'static str) -> impl FnOnce(MemberPersistenceError) -> MemberError {
    move |error| {
        debug!(operation, %error, "member repository failed");
        MemberError::store(operation, error.to_string())
    }
}

/// Values a write attempted to claim, used to report commit-time conflicts.
struct Claimed<'a> {
    email: Option<&'a EmailAddress>,
    phone: Option<&'a PhoneNumber>,
}

impl Claimed<'_> {
    fn value(&self, field: MemberField) -> Option<String> {
        match field {
            MemberField::Email => self.email.map(ToString::to_string),
            MemberField::Phone => self.phone.map(ToString::to_string),
            MemberField::Id | MemberField::Name => None,
        }
    }
}

fn write_error(
    operation: &'static str,
    claimed: &Claimed<'_>,
    error: MemberPersistenceError,
) -> MemberError {
    let conflict = match &error {
        MemberPersistenceError::UniqueViolation {
            constraint: Some(field),
            ..
        } => claimed.value(*field).map(|value| (*field, value)),
        _ => None,
    };
    match conflict {
        Some((field, value)) => {
            warn!(operation, %field, "unique constraint rejected write after pre-check");
            MemberError::already_exists(field, value)
        }
        None => store_error(operation)(error),
    }
}

/// Service implementing [`MemberDirectory`] over any [`MemberRepository`].
#[derive(Clone)]
pub struct MemberService<R> {
    repo: Arc<R>,
}

impl<R> MemberService<R> {
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> MemberService<R>
where
    R: MemberRepository,
{
    async fn lookup(&self, id: MemberId) -> Result<Option<Member>, MemberError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(store_error("find_member_by_id"))
    }

    async fn lookup_email(&self, email: &str) -> Result<Option<Member>, MemberError> {
        self.repo
            .find_by_email(email)
            .await
            .map_err(store_error("find_member_by_email"))
    }

    async fn lookup_phone(&self, phone: &str) -> Result<Option<Member>, MemberError> {
        self.repo
            .find_by_phone(phone)
            .await
            .map_err(store_error("find_member_by_phone"))
    }

    /// Fail with `AlreadyExists` when a member other than `owner` holds the
    /// email.
    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        owner: Option<MemberId>,
    ) -> Result<(), MemberError> {
        match self.lookup_email(email.as_str()).await? {
            Some(existing) if Some(existing.id()) != owner => {
                Err(MemberError::already_exists(MemberField::Email, email.as_str()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_phone_free(
        &self,
        phone: &PhoneNumber,
        owner: Option<MemberId>,
    ) -> Result<(), MemberError> {
        match self.lookup_phone(phone.as_str()).await? {
            Some(existing) if Some(existing.id()) != owner => {
                Err(MemberError::already_exists(MemberField::Phone, phone.as_str()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> MemberDirectory for MemberService<R>
where
    R: MemberRepository,
{
    async fn create(&self, draft: MemberDraft) -> Result<Member, MemberError> {
        let member = validate_all(&draft.name, &draft.email, draft.phone.as_deref())?;

        self.ensure_email_free(&member.email, None).await?;
        if let Some(phone) = &member.phone {
            self.ensure_phone_free(phone, None).await?;
        }

        let claimed = Claimed {
            email: Some(&member.email),
            phone: member.phone.as_ref(),
        };
        let created = self
            .repo
            .insert(&member)
            .await
            .map_err(|error| write_error("create_member", &claimed, error))?;

        info!(member_id = %created.id(), "member created");
        Ok(created)
    }

    async fn get(&self, id: MemberId) -> Result<Member, MemberError> {
        self.lookup(id)
            .await?
            .ok_or_else(|| MemberError::member_not_found(id))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Member>, MemberError> {
        self.repo
            .list(skip, limit.min(MAX_LIST_LIMIT))
            .await
            .map_err(store_error("list_members"))
    }

    async fn update(&self, id: MemberId, patch: MemberPatch) -> Result<Member, MemberError> {
        let current = self
            .lookup(id)
            .await?
            .ok_or_else(|| MemberError::member_not_found(id))?;

        let changes = validate_changes(&patch)?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(id)).await?;
        }
        // A cleared phone cannot collide with anything.
        if let Some(Some(phone)) = &changes.phone {
            self.ensure_phone_free(phone, Some(id)).await?;
        }

        let claimed = Claimed {
            email: changes.email.as_ref(),
            phone: changes.phone.as_ref().and_then(Option::as_ref),
        };
        let updated = self
            .repo
            .update(id, &changes)
            .await
            .map_err(|error| write_error("update_member", &claimed, error))?
            .ok_or_else(|| MemberError::member_not_found(id))?;

        info!(member_id = %id, "member updated");
        Ok(updated)
    }

    async fn delete(&self, id: MemberId) -> Result<(), MemberError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(store_error("delete_member"))?;
        if !deleted {
            return Err(MemberError::member_not_found(id));
        }

        info!(member_id = %id, "member deleted");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberError> {
        self.lookup_email(&email.trim().to_lowercase()).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, MemberError> {
        self.lookup_phone(phone.trim()).await
    }
}

#[cfg(test)]
#[path = "member_service_tests.rs"]
mod tests;
