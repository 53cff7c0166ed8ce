//! Shared utilities for the IP allocation crates.
//!
//! This crate provides lenient value parsing used by every ingestion path
//! and helpers for reading Polars `AnyValue`s back out of output frames.

pub mod values;

pub use values::{
    any_to_f64, any_to_string, any_to_u64, format_numeric, is_missing_marker, parse_f64,
    parse_u64,
};
