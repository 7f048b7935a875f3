use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::CellValue;
use crate::core::primitives::coerce_decimal;

/// Hashable group key derived from a label cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LabelKey {
    Number(OrderedFloat<f64>),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl LabelKey {
    fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Number(value) if value.is_finite() => Some(Self::Number(OrderedFloat(*value))),
            CellValue::Timestamp(time) => Some(Self::Timestamp(*time)),
            CellValue::Text(text) if !text.trim().is_empty() => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

/// One aggregated label with its summed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieGroup {
    pub label: CellValue,
    pub total: Decimal,
}

/// Result of grouping rows by label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieAggregation {
    pub groups: Vec<PieGroup>,
    /// Rows whose value could not be coerced to a number or would overflow
    /// their group total.
    pub dropped_rows: usize,
    /// Subset of `dropped_rows` rejected because the group total overflowed.
    pub overflowed_rows: usize,
    /// Rows whose label was empty.
    pub unlabeled_rows: usize,
    /// Rows that contributed to some group total.
    pub summed_rows: usize,
}

/// Groups `labels[i]` → sum of `values[i]`, in first-encountered order.
///
/// A row whose value does not coerce, or whose value would overflow the
/// group total, is dropped from the sum; its label still opens a group
/// (with a zero total) so group order only depends on the labels column.
/// Rows with an empty label are skipped.
#[must_use]
pub fn aggregate_pie_groups(labels: &[CellValue], values: &[CellValue]) -> PieAggregation {
    let mut groups: IndexMap<LabelKey, (CellValue, Decimal)> = IndexMap::new();
    let mut aggregation = PieAggregation::default();

    for (label, value) in labels.iter().zip(values) {
        let Some(key) = LabelKey::from_cell(label) else {
            aggregation.unlabeled_rows += 1;
            continue;
        };
        let entry = groups
            .entry(key)
            .or_insert_with(|| (label.clone(), Decimal::ZERO));
        match coerce_decimal(value).map(|amount| entry.1.checked_add(amount)) {
            Some(Some(total)) => {
                entry.1 = total;
                aggregation.summed_rows += 1;
            }
            Some(None) => {
                warn!(label = %label, value = %value, "pie group total overflowed, dropping row");
                aggregation.overflowed_rows += 1;
                aggregation.dropped_rows += 1;
            }
            None => aggregation.dropped_rows += 1,
        }
    }

    aggregation.groups = groups
        .into_values()
        .map(|(label, total)| PieGroup { label, total })
        .collect();
    aggregation
}

/// Keeps the `top_n` largest groups, largest first.
///
/// Ties keep first-encountered order. Discarded groups are omitted.
#[must_use]
pub fn select_top_groups(mut groups: Vec<PieGroup>, top_n: usize) -> Vec<PieGroup> {
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(top_n);
    groups
}
