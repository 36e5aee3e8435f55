//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! [`MemberDirectory`] driving port, so they can be tested against a mock or
//! the in-memory store without I/O.

use std::sync::Arc;

use crate::domain::ports::MemberDirectory;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Member directory the handlers call through.
    pub members: Arc<dyn MemberDirectory>,
}

impl HttpState {
    /// Wrap the directory for sharing across workers.
    pub fn new(members: Arc<dyn MemberDirectory>) -> Self {
        Self { members }
    }
}
