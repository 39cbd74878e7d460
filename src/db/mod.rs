//! SQLite plumbing: schema and row conversion.

pub mod converters;
pub mod schema;
