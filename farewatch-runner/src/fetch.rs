//! Section fetch layer: one query per section, failures swallowed.

use farewatch_core::{FetchOutcome, QuerySource, SectionId};

use crate::queries::QueryCatalog;

/// Binds a query source to the tenant's query catalog.
pub struct SectionFetcher<'a> {
    source: &'a dyn QuerySource,
    catalog: QueryCatalog,
}

impl<'a> SectionFetcher<'a> {
    pub fn new(source: &'a dyn QuerySource, catalog: QueryCatalog) -> Self {
        Self { source, catalog }
    }

    /// Execute the section's query: exactly one read, no retry.
    ///
    /// A source error is folded into the outcome here — it is reported
    /// through progress callbacks but never crosses the section boundary.
    pub fn fetch(&self, section: SectionId) -> FetchOutcome {
        match self.source.query(&self.catalog.sql(section)) {
            Ok(rows) => FetchOutcome::Rows(rows),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farewatch_core::{Row, SourceError};

    struct StaticSource {
        result: Result<usize, String>,
    }

    impl QuerySource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn query(&self, _sql: &str) -> Result<Vec<Row>, SourceError> {
            match &self.result {
                Ok(n) => Ok(vec![Row::new(); *n]),
                Err(msg) => Err(SourceError::Other(msg.clone())),
            }
        }
    }

    #[test]
    fn success_becomes_rows() {
        let source = StaticSource { result: Ok(3) };
        let fetcher = SectionFetcher::new(&source, QueryCatalog::new("p", "d"));
        let outcome = fetcher.fetch(SectionId::Alerts);
        assert_eq!(outcome.row_count(), 3);
        assert!(!outcome.is_failed());
    }

    #[test]
    fn source_error_becomes_failed_outcome() {
        let source = StaticSource {
            result: Err("connection reset".into()),
        };
        let fetcher = SectionFetcher::new(&source, QueryCatalog::new("p", "d"));
        let outcome = fetcher.fetch(SectionId::ModelMetrics);
        assert!(outcome.is_failed());
    }
}
