//! Async utilities
//!
//! - Timeout wrapper that keeps the inner error distinguishable from expiry
//! - Wall-clock timing of a future
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::async_utils::{timed, with_timeout};
//! use std::time::Duration;
//!
//! let (result, elapsed) = timed(with_timeout(Duration::from_secs(30), call_provider())).await;
//! ```

pub mod timeout;

pub use timeout::{timed, with_timeout, TimeoutError};
