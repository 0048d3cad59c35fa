//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store for development and tests
//! - **cache**: the TTL-bound home feed cache
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod cache;
pub mod memory;
pub mod persistence;
