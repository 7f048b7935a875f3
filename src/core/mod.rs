pub mod dataset;
pub mod pie_aggregation;
pub mod primitives;
pub mod types;

pub use dataset::{Column, Dataset, DatasetSchema};
pub use pie_aggregation::{PieAggregation, PieGroup, aggregate_pie_groups, select_top_groups};
pub use types::{CellValue, ColumnKind, HexColor};
