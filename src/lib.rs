#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Table sizing constants, the insertion policy and map configuration.
pub mod config;

/// Cursors that traverse a map while removing entries from it.
pub mod cursor;

/// Strategies deciding which keys are the same.
pub mod equivalence;

mod error;

/// An identity hash map backed by the open-addressing table.
///
/// This module provides `IdentityHashMap`, which wraps a `RawTable` and
/// provides a standard key-value map interface over a pluggable key
/// equivalence.
pub mod hash_map;

pub mod hash_table;

/// Key, value and entry views of a map.
pub mod views;

#[cfg(feature = "rayon")]
mod rayon_impls;

#[cfg(feature = "serde")]
mod serde_impls;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use config::InsertPolicy;
pub use cursor::Cursor;
pub use error::Error;
pub use hash_map::Entry;
pub use hash_map::IdentityHashMap;
pub use hash_table::RawTable;
#[cfg(feature = "rayon")]
pub use rayon_impls::ParIter;
