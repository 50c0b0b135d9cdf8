//! splitbook-ingest: CSV statement reading, header discovery and cell normalization.

pub mod columns;
pub mod error;
pub mod normalize;
pub mod reader;

pub use columns::{ColumnMap, Field, map_columns};
pub use error::IngestError;
pub use normalize::{normalize_party, parse_amount};
pub use reader::StatementReader;
