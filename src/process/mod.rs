pub mod aggregate;
pub mod calendar;
pub mod date_parser;
pub mod enrich;
pub mod lookup;
pub mod normalize;
pub mod raw_table;
pub mod reshape;
