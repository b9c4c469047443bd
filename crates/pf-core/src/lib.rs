//! pf-core: stable foundation for pidflow.
//!
//! Contains:
//! - numeric (Real + tolerances + rounding/finiteness helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use numeric::*;
