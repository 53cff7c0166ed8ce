#![deny(unsafe_code)]

pub mod aggregates;
pub mod error;
pub mod iso3166;
pub mod rir;
pub mod tables;

pub use crate::error::StandardsError;
pub use crate::tables::{
    ClassificationTables, CodeException, CodeRename, CountryEntry, Fallback, PartitionOverlap,
    RirMembers,
};
