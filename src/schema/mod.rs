pub mod columns;
pub mod table;

pub use table::{to_record_batch, TableRow};
