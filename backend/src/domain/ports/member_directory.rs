//! Driving port exposing member directory operations to inbound adapters.

use async_trait::async_trait;

use crate::domain::{Member, MemberDraft, MemberError, MemberId, MemberPatch};

/// Create, read, update and delete operations over the member directory.
///
/// Implementations validate raw input, guard the email and phone uniqueness
/// invariants and translate every persistence failure into [`MemberError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Validate and store a new member.
    async fn create(&self, draft: MemberDraft) -> Result<Member, MemberError>;

    /// Fetch a member, failing with `NotFound` when absent.
    async fn get(&self, id: MemberId) -> Result<Member, MemberError>;

    /// Page through members in ascending identifier order.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Member>, MemberError>;

    /// Apply a partial update to an existing member.
    async fn update(&self, id: MemberId, patch: MemberPatch) -> Result<Member, MemberError>;

    /// Remove a member permanently.
    async fn delete(&self, id: MemberId) -> Result<(), MemberError>;

    /// Look up a member by email, matched case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberError>;

    /// Look up a member by phone, matched on the trimmed value.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, MemberError>;
}
