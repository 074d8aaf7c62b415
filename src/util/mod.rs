//! Provide modular arithmetic and randomness helpers.
//!
//! The utility objects in this submodule are not documented.
//! Use at your own risk.
#![allow(missing_docs)]

mod basic;
pub mod batch;
pub(crate) mod hash;
mod random_generator;
mod uintsmallmod;

// gather utilities in this module
pub use basic::*;
pub use uintsmallmod::*;
pub use random_generator::{BlakeRNGFactory, BlakeRNG, PRNGSeed};
