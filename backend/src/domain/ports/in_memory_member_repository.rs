//! Process-local member store used when no database is configured and in
//! tests.
//!
//! The store mirrors the Postgres schema: identifiers come from a monotonic
//! sequence and the email and phone unique indexes are enforced on every
//! write. Writes are staged and only applied once every constraint passes, so
//! a rejected write leaves the store unchanged.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{Member, MemberChanges, MemberField, MemberId, NewMember};

use super::{MemberPersistenceError, MemberRepository};

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<MemberId, Member>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl Table {
    /// Reject `candidate` if another row already holds its email or phone.
    fn check_unique(
        &self,
        candidate: &Member,
        exclude: Option<MemberId>,
    ) -> Result<(), MemberPersistenceError> {
        let others = self
            .rows
            .values()
            .filter(|row| Some(row.id()) != exclude);
        for row in others {
            if row.email() == candidate.email() {
                return Err(MemberPersistenceError::unique_violation(
                    MemberField::Email,
                    format!(
                        "duplicate key value violates unique constraint \"members_email_key\": {}",
                        candidate.email()
                    ),
                ));
            }
            let phone_taken = candidate
                .phone()
                .filter(|wanted| row.phone() == Some(*wanted));
            if let Some(wanted) = phone_taken {
                return Err(MemberPersistenceError::unique_violation(
                    MemberField::Phone,
                    format!(
                        "duplicate key value violates unique constraint \"members_phone_key\": {wanted}"
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Member repository backed by a mutex-guarded ordered map.
#[derive(Debug, Default)]
pub struct InMemoryMemberRepository {
    table: Mutex<Table>,
}

impl InMemoryMemberRepository {
    /// Empty store; identifiers start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // A panic mid-write never leaves a half-applied row, so the data is
        // still consistent after poisoning.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, MemberPersistenceError> {
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberPersistenceError> {
        Ok(self
            .lock()
            .rows
            .values()
            .find(|member| member.email().as_str() == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, MemberPersistenceError> {
        Ok(self
            .lock()
            .rows
            .values()
            .find(|member| member.phone().is_some_and(|p| p.as_str() == phone))
            .cloned())
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Member>, MemberPersistenceError> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .lock()
            .rows
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, member: &NewMember) -> Result<Member, MemberPersistenceError> {
        let mut table = self.lock();
        let staged = Member::new(MemberId::new(table.next_id), member.clone());
        table.check_unique(&staged, None)?;

        table.next_id += 1;
        table.rows.insert(staged.id(), staged.clone());
        Ok(staged)
    }

    async fn update(
        &self,
        id: MemberId,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, MemberPersistenceError> {
        let mut table = self.lock();
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let staged = current.with_changes(changes);
        table.check_unique(&staged, Some(id))?;

        table.rows.insert(id, staged.clone());
        Ok(Some(staged))
    }

    async fn delete(&self, id: MemberId) -> Result<bool, MemberPersistenceError> {
        Ok(self.lock().rows.remove(&id).is_some())
    }
}
