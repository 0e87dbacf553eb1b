//! Repository pattern implementations for database access
//!
//! Each repository exposes `insert`, `find_by` and `find_one`.

pub mod run_repo;
pub mod user_repo;

pub use run_repo::{RunQuery, RunRepository};
pub use user_repo::{UserQuery, UserRepository};
