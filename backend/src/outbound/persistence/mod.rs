//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port has a Diesel implementation sharing one `bb8` pool.
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; adapters only translate between rows and domain types.
//!
//! # Example
//!
//! ```no_run
//! use blog::outbound::persistence::{DbPool, PoolConfig, postgres_store_ports};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let ports = postgres_store_ports(&pool);
//! # let _ = ports;
//! # Ok(())
//! # }
//! ```

mod diesel_comment_repository;
mod diesel_error_mapping;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_helpers;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use std::sync::Arc;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

use crate::domain::ports::StorePorts;

/// Bundle Diesel repositories sharing `pool`.
pub fn postgres_store_ports(pool: &DbPool) -> StorePorts {
    StorePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        groups: Arc::new(DieselGroupRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        follows: Arc::new(DieselFollowRepository::new(pool.clone())),
    }
}
