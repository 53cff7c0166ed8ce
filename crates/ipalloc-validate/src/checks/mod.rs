//! Individual table checks.

pub mod columns;
pub mod pool;
pub mod series;

use polars::prelude::{AnyValue, Column, DataFrame};

/// Cell accessor that treats out-of-range and unreadable cells as null.
pub(crate) fn cell<'a>(column: &'a Column, idx: usize) -> AnyValue<'a> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Column> {
    df.column(name).ok()
}
