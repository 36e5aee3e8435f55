//! Domain ports and supporting types for the hexagonal boundary.
//!
//! `MemberRepository` is the driven port persistence adapters implement;
//! `MemberDirectory` is the driving port inbound adapters call through.

mod macros;
pub(crate) use macros::define_port_error;

mod in_memory_member_repository;
mod member_directory;
mod member_repository;

pub use in_memory_member_repository::InMemoryMemberRepository;
#[cfg(test)]
pub use member_directory::MockMemberDirectory;
pub use member_directory::MemberDirectory;
#[cfg(test)]
pub use member_repository::MockMemberRepository;
pub use member_repository::{MemberPersistenceError, MemberRepository};
