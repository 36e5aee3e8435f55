//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed member repository using Diesel ORM.
//!
//! The in-memory store lives beside the port in `domain::ports` because it
//! carries no infrastructure dependency.

pub mod persistence;
