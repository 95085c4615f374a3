//! Dataset loading
//!
//! Fetches the three feeds once at startup and bundles them into an
//! immutable `Dataset`. Any failure here is fatal to the caller.

use std::sync::Arc;

use super::error::DatasetResult;
use super::parse::parse_table;
use super::source::FeedSource;
use super::types::{Category, Dataset, TimeSeriesTable};

/// Loads the three feeds from a source
pub struct DatasetLoader {
    source: Box<dyn FeedSource>,
}

impl DatasetLoader {
    pub fn new(source: impl FeedSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Fetch, parse and validate all three feeds
    pub async fn load(&self) -> DatasetResult<Arc<Dataset>> {
        let (confirmed, deaths, recovered) = tokio::try_join!(
            self.load_table(Category::Confirmed),
            self.load_table(Category::Deaths),
            self.load_table(Category::Recovered),
        )?;

        let dataset = Dataset::new(confirmed, deaths, recovered)?;

        tracing::info!(
            regions = dataset.region_count(),
            dates = dataset.dates().len(),
            first = %dataset.first_date(),
            last = %dataset.last_date(),
            "Dataset loaded"
        );

        Ok(Arc::new(dataset))
    }

    async fn load_table(&self, category: Category) -> DatasetResult<TimeSeriesTable> {
        tracing::info!(category = %category, from = %self.source.describe(category), "Fetching feed");
        let text = self.source.fetch(category).await?;
        parse_table(category, &text)
    }
}

/// Build a dataset straight from three CSV strings (useful for testing)
pub fn dataset_from_csv(
    confirmed: &str,
    deaths: &str,
    recovered: &str,
) -> DatasetResult<Arc<Dataset>> {
    let dataset = Dataset::new(
        parse_table(Category::Confirmed, confirmed)?,
        parse_table(Category::Deaths, deaths)?,
        parse_table(Category::Recovered, recovered)?,
    )?;
    Ok(Arc::new(dataset))
}
