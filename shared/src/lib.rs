//! Shared types and domain rules for the Asset Inventory Platform
//!
//! This crate contains the pure logic shared between the backend and the
//! browser (via WASM): unique code format, warranty dates, propagation rules
//! and field validation.

pub mod codes;
pub mod propagation;
pub mod types;
pub mod validation;
pub mod warranty;

pub use codes::*;
pub use propagation::*;
pub use types::*;
pub use validation::*;
pub use warranty::*;
