#![deny(missing_docs)]

//! AVM SDK - Complete SDK.
//!
//! Re-exports all AVM SDK components for convenient single-crate usage.

pub use avm_primitives as primitives;
pub use avm_transaction as transaction;
