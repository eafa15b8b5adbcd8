//! Data module - dataset loading and column classification

mod loader;
mod schema;

pub use loader::{frame_from_json, DataLoader, LoaderError};
pub use schema::{column_kinds, ColumnKind};
