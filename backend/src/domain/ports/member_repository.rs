//! Driven port for member persistence adapters and their errors.
//!
//! Adapters store members durably and enforce the email and phone unique
//! indexes at commit time. Pre-checks in the service give friendly errors;
//! the index is the final arbiter when two writers race.

use async_trait::async_trait;

use crate::domain::{Member, MemberChanges, MemberField, MemberId, NewMember};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by member repository adapters.
    pub enum MemberPersistenceError {
        /// Repository connection could not be established.
        Connection {
            /// Driver or pool diagnostic.
            message: String,
        } => "member repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Driver diagnostic.
            message: String,
        } => "member repository query failed: {message}",
        /// A unique index rejected the write.
        UniqueViolation {
            /// Field the violated index covers, when it can be attributed.
            constraint: Option<MemberField>,
            /// Driver diagnostic.
            message: String,
        } => "member repository unique constraint violated: {message}",
    }
}

/// Durable keyed storage of member records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Fetch a member by identifier.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, MemberPersistenceError>;

    /// Fetch the member holding a normalised email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberPersistenceError>;

    /// Fetch the member holding a normalised phone number.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, MemberPersistenceError>;

    /// Read a page of members ordered by ascending identifier.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Member>, MemberPersistenceError>;

    /// Store a new member and return it with its assigned identifier.
    async fn insert(&self, member: &NewMember) -> Result<Member, MemberPersistenceError>;

    /// Apply changes to an existing member atomically.
    ///
    /// Returns `Ok(None)` when no member carries `id`.
    async fn update(
        &self,
        id: MemberId,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, MemberPersistenceError>;

    /// Remove a member; returns whether a row was deleted.
    async fn delete(&self, id: MemberId) -> Result<bool, MemberPersistenceError>;
}
