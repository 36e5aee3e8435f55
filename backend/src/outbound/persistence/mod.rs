//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! [`DieselMemberRepository`] implements the domain's `MemberRepository`
//! port over a `bb8` pool of `diesel-async` connections. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module; only domain types cross the boundary.
//!
//! # Example
//!
//! ```no_run
//! use member_directory::outbound::persistence::{DbPool, DieselMemberRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/members")).await?;
//! let repo = DieselMemberRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_member_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_member_repository::DieselMemberRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
