#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod hash;

pub mod config;

/// Errors returned by table operations and configuration setters.
pub mod error;

pub mod hash_table;

pub mod anagram;

pub mod permutation;

pub use config::TableConfig;
pub use error::ConfigError;
pub use error::TableError;
pub use hash_table::Entry;
pub use hash_table::Table;
