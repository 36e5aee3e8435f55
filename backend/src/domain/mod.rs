//! Domain primitives, validators and the member service.
//!
//! Purpose: Define the member model, the rules every stored member obeys
//! and the facade that orchestrates validation, uniqueness checks and
//! persistence. Nothing in this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Member (alias to `member::Member`): persisted member record.
//! - MemberError (alias to `error::MemberError`): the four failure kinds.
//! - MemberService (alias to `member_service::MemberService`): CRUD facade.
//! - validation: pure field validators.
//! - ports: repository and directory traits plus the in-memory store.

pub mod error;
pub mod member;
pub mod member_service;
pub mod ports;
pub mod validation;

pub use self::error::{FieldViolation, MemberError, MemberField};
pub use self::member::{
    EmailAddress, Member, MemberChanges, MemberDraft, MemberId, MemberName, MemberPatch,
    NewMember, PhoneNumber,
};
pub use self::member_service::{MAX_LIST_LIMIT, MemberService};

/// Result alias for member directory operations.
///
/// # Examples
/// ```
/// use member_directory::domain::{MemberError, MemberId, MemberResult};
///
/// fn lookup(id: MemberId) -> MemberResult<()> {
///     Err(MemberError::member_not_found(id))
/// }
///
/// assert!(lookup(MemberId::new(3)).is_err());
/// ```
pub type MemberResult<T> = Result<T, MemberError>;
