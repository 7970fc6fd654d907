use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Array},
    datatypes::Schema as ArrowSchema,
    record_batch::RecordBatch,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// A row type that can be laid out as one Arrow table.
/// - `schema` names and types the columns.
/// - `to_arrays` turns a slice of rows into one array per column, in schema order.
pub trait TableRow: Sized {
    /// Arrow schema for this row type
    fn schema() -> ArrowSchema;
    /// Convert rows into column arrays matching the schema
    fn to_arrays(rows: &[Self]) -> Vec<ArrayRef>;
}

/// Build a `RecordBatch` from typed rows.
pub fn to_record_batch<R: TableRow>(rows: &[R]) -> Result<RecordBatch> {
    let schema = Arc::new(R::schema());
    RecordBatch::try_new(schema, R::to_arrays(rows)).context("building record batch")
}

/// Days since 1970-01-01, the Arrow `Date32` representation.
pub fn date32(date: NaiveDate) -> i32 {
    date.signed_duration_since(DateTime::<Utc>::UNIX_EPOCH.date_naive())
        .num_days() as i32
}

/// Date column with nulls for missing dates.
pub fn date_array<'a>(dates: impl Iterator<Item = Option<&'a NaiveDate>>) -> ArrayRef {
    Arc::new(dates.map(|d| d.copied().map(date32)).collect::<Date32Array>())
}
