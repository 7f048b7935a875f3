use indexmap::IndexMap;

use crate::core::Dataset;
use crate::error::{DatasetError, DatasetResult};

use super::{DatasetFormat, DatasetLocation};

/// Loads datasets from wherever the host keeps them.
pub trait DatasetProvider {
    fn load(&self, location: &DatasetLocation) -> DatasetResult<Dataset>;
}

impl<T: DatasetProvider + ?Sized> DatasetProvider for &T {
    fn load(&self, location: &DatasetLocation) -> DatasetResult<Dataset> {
        (**self).load(location)
    }
}

/// Pre-parsed datasets keyed by path (and sheet for spreadsheets).
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetProvider {
    datasets: IndexMap<(String, Option<String>), Dataset>,
}

impl InMemoryDatasetProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dataset(mut self, path: impl Into<String>, dataset: Dataset) -> Self {
        self.datasets.insert((path.into(), None), dataset);
        self
    }

    #[must_use]
    pub fn with_sheet(
        mut self,
        path: impl Into<String>,
        sheet_name: impl Into<String>,
        dataset: Dataset,
    ) -> Self {
        self.datasets
            .insert((path.into(), Some(sheet_name.into())), dataset);
        self
    }
}

impl DatasetProvider for InMemoryDatasetProvider {
    /// Spreadsheets without a sheet name resolve to the first sheet
    /// registered for the path.
    fn load(&self, location: &DatasetLocation) -> DatasetResult<Dataset> {
        let key = (location.path.clone(), location.sheet_name.clone());
        if let Some(dataset) = self.datasets.get(&key) {
            return Ok(dataset.clone());
        }
        if location.format == DatasetFormat::Spreadsheet && location.sheet_name.is_none() {
            if let Some(dataset) = self
                .datasets
                .iter()
                .find(|((path, _), _)| *path == location.path)
                .map(|(_, dataset)| dataset)
            {
                return Ok(dataset.clone());
            }
        }
        Err(DatasetError::NotFound {
            path: match &location.sheet_name {
                Some(sheet) => format!("{}#{sheet}", location.path),
                None => location.path.clone(),
            },
        })
    }
}
