use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::{parse_decimal_text, parse_timestamp_text};
use crate::core::{CellValue, ColumnKind};
use crate::error::{ChartError, ChartResult};

/// One named column with its inferred type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Builds a column and infers its kind from the values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = infer_kind(&values);
        Self {
            name: name.into(),
            kind,
            values,
        }
    }
}

/// Read-only view of a dataset's column names and kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetSchema {
    columns: IndexMap<String, ColumnKind>,
}

impl DatasetSchema {
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    #[must_use]
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.columns.get(column).copied()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Named, ordered set of equally long columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    row_count: usize,
    columns: IndexMap<String, Column>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> ChartResult<Self> {
        let name = name.into();
        let row_count = columns.first().map_or(0, |column| column.values.len());
        let mut by_name = IndexMap::with_capacity(columns.len());
        for column in columns {
            if column.values.len() != row_count {
                return Err(ChartError::InvalidData(format!(
                    "column `{}` has {} rows, expected {row_count}",
                    column.name,
                    column.values.len()
                )));
            }
            if by_name.contains_key(&column.name) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate column `{}`",
                    column.name
                )));
            }
            by_name.insert(column.name.clone(), column);
        }
        debug!(dataset = %name, columns = by_name.len(), row_count, "dataset assembled");
        Ok(Self {
            name,
            row_count,
            columns: by_name,
        })
    }

    /// Builds a dataset from raw text rows, inferring every column's kind.
    ///
    /// Short rows are padded with empty cells; extra cells are rejected.
    pub fn from_text_rows<S: AsRef<str>>(
        name: impl Into<String>,
        headers: &[S],
        rows: &[Vec<String>],
    ) -> ChartResult<Self> {
        let mut raw: Vec<Vec<&str>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() > headers.len() {
                return Err(ChartError::InvalidData(format!(
                    "row {row_index} has {} cells but only {} headers",
                    row.len(),
                    headers.len()
                )));
            }
            for (column_index, cells) in raw.iter_mut().enumerate() {
                cells.push(row.get(column_index).map_or("", String::as_str));
            }
        }

        let columns = headers
            .iter()
            .zip(raw)
            .map(|(header, cells)| typed_column(header.as_ref(), &cells))
            .collect();
        Self::new(name, columns)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> ChartResult<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| ChartError::ColumnNotFound {
                column: name.to_owned(),
            })
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    #[must_use]
    pub fn schema(&self) -> DatasetSchema {
        DatasetSchema {
            columns: self
                .columns
                .values()
                .map(|column| (column.name.clone(), column.kind))
                .collect(),
        }
    }
}

fn typed_column(name: &str, cells: &[&str]) -> Column {
    let non_empty = || cells.iter().filter(|cell| !cell.trim().is_empty());
    let numeric = non_empty().all(|cell| parse_decimal_text(cell).is_some());
    let temporal = !numeric && non_empty().all(|cell| parse_timestamp_text(cell).is_some());

    let values = cells
        .iter()
        .map(|cell| {
            if cell.trim().is_empty() {
                return CellValue::Empty;
            }
            if numeric {
                if let Ok(value) = cell.trim().parse::<f64>() {
                    return CellValue::Number(value);
                }
            }
            if temporal {
                if let Some(time) = parse_timestamp_text(cell) {
                    return CellValue::Timestamp(time);
                }
            }
            CellValue::Text((*cell).to_owned())
        })
        .collect();

    Column::new(name, values)
}

fn infer_kind(values: &[CellValue]) -> ColumnKind {
    let mut present = values.iter().filter(|value| !value.is_empty()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }
    let mut numeric = true;
    let mut temporal = true;
    for value in present {
        match value {
            CellValue::Number(_) => temporal = false,
            CellValue::Timestamp(_) => numeric = false,
            CellValue::Text(_) | CellValue::Empty => {
                numeric = false;
                temporal = false;
            }
        }
    }
    if numeric {
        ColumnKind::Numeric
    } else if temporal {
        ColumnKind::Temporal
    } else {
        ColumnKind::Text
    }
}
