//! Paginated revision lookup.
//!
//! Locators are encoded in one forward pass over analyses and their
//! dependencies, buffered into pages of at most `page_size`, and each page is
//! sent as a single request. Pages are fetched one after another and their
//! records appended in arrival order, so the result follows input order.

use crate::api::RevisionApi;
use crate::error::ReportError;
use crate::locator;
use crate::models::{Analysis, RevisionRecord};
use crate::progress::Progress;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Builds `locator[0]=..&locator[1]=..` for one page. Indices restart at zero
/// on every page.
pub fn page_query(locators: &[String]) -> String {
    locators
        .iter()
        .enumerate()
        .map(|(i, loc)| format!("locator[{}]={}", i, loc))
        .collect::<Vec<_>>()
        .join("&")
}

/// Records received so far, plus the denominator for progress messages.
#[derive(Debug)]
pub struct Aggregate {
    records: Vec<RevisionRecord>,
    total: usize,
}

impl Aggregate {
    pub fn new(total: usize) -> Self {
        Self {
            records: Vec::new(),
            total,
        }
    }

    pub fn push_page(&mut self, page: Vec<RevisionRecord>) {
        self.records.extend(page);
    }

    /// `total` counts every dependency, resolved or not, so the numerator
    /// can stay below it even after the last page.
    pub fn progress_message(&self) -> String {
        format!(
            "Loading licenses ({}/{} done)...",
            self.records.len(),
            self.total
        )
    }

    pub fn into_records(self) -> Vec<RevisionRecord> {
        self.records
    }
}

pub struct BatchFetcher {
    page_size: usize,
}

impl Default for BatchFetcher {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BatchFetcher {
    pub fn new(page_size: usize) -> Result<Self, ReportError> {
        if page_size == 0 {
            return Err(ReportError::InvalidPageSize);
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Look up every resolved dependency across `analyses`.
    ///
    /// Any failing page aborts the whole lookup; no partial result is returned.
    pub async fn fetch_all<A, P>(
        &self,
        api: &A,
        analyses: &[Analysis],
        progress: &mut P,
    ) -> Result<Vec<RevisionRecord>, ReportError>
    where
        A: RevisionApi,
        P: Progress + ?Sized,
    {
        progress.set_message("Loading licenses...".to_string());
        progress.start();
        let result = self.fetch_pages(api, analyses, progress).await;
        progress.stop();
        result.map(Aggregate::into_records)
    }

    async fn fetch_pages<A, P>(
        &self,
        api: &A,
        analyses: &[Analysis],
        progress: &mut P,
    ) -> Result<Aggregate, ReportError>
    where
        A: RevisionApi,
        P: Progress + ?Sized,
    {
        let total = analyses.iter().map(|a| a.dependencies.len()).sum();
        let mut aggregate = Aggregate::new(total);
        let mut pending: Vec<String> = Vec::with_capacity(self.page_size);

        let encoded = analyses
            .iter()
            .flat_map(|a| a.dependencies.iter())
            .filter_map(locator::encode);

        // TODO: fetch pages concurrently; records must still be appended in page order.
        for loc in encoded {
            pending.push(loc);
            if pending.len() == self.page_size {
                let page = fetch_page(api, &pending).await?;
                aggregate.push_page(page);
                pending.clear();
                report_progress(progress, &aggregate);
            }
        }

        if !pending.is_empty() {
            let page = fetch_page(api, &pending).await?;
            aggregate.push_page(page);
            report_progress(progress, &aggregate);
        }

        Ok(aggregate)
    }
}

fn report_progress<P: Progress + ?Sized>(progress: &mut P, aggregate: &Aggregate) {
    progress.stop();
    progress.set_message(aggregate.progress_message());
    progress.start();
}

async fn fetch_page<A: RevisionApi>(
    api: &A,
    locators: &[String],
) -> Result<Vec<RevisionRecord>, ReportError> {
    let query = page_query(locators);
    tracing::debug!(count = locators.len(), "fetching revisions page");

    let body = api
        .get_revisions(&query)
        .await
        .map_err(|source| ReportError::Fetch {
            locators: locators.to_vec(),
            source,
        })?;

    let page: Vec<RevisionRecord> =
        serde_json::from_str(&body).map_err(|source| ReportError::Parse {
            locators: locators.to_vec(),
            source,
        })?;

    tracing::debug!(records = page.len(), "received revisions page");
    Ok(page)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::TransportError;
    use crate::models::{Dependency, Module};
    use crate::progress::Silent;

    /// Answers every request with one record per locator, named after the
    /// escaped locator, and remembers the queries it saw.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub queries: Mutex<Vec<String>>,
        pub fail_on: Option<usize>,
        pub malformed_on: Option<usize>,
    }

    impl FakeApi {
        pub fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl RevisionApi for FakeApi {
        async fn get_revisions(&self, query: &str) -> Result<String, TransportError> {
            let mut queries = self.queries.lock().unwrap();
            let call = queries.len();
            queries.push(query.to_string());

            if self.fail_on == Some(call) {
                return Err(TransportError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
            if self.malformed_on == Some(call) {
                return Ok("{not json".to_string());
            }

            let records: Vec<serde_json::Value> = query
                .split('&')
                .map(|pair| {
                    let loc = pair.split_once('=').map(|(_, v)| v).unwrap_or("");
                    serde_json::json!({
                        "Loc": {"Package": loc, "Revision": ""},
                        "Licenses": [{"spdx_id": "MIT", "Title": "MIT", "FullText": "mit"}],
                        "Project": {"Title": loc, "URL": format!("https://example.com/{}", loc), "Authors": []}
                    })
                })
                .collect();
            Ok(serde_json::to_string(&records).unwrap())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        messages: Vec<String>,
        starts: usize,
        stops: usize,
    }

    impl Progress for RecordingProgress {
        fn start(&mut self) {
            self.starts += 1;
        }
        fn set_message(&mut self, message: String) {
            self.messages.push(message);
        }
        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    pub(crate) fn dep(locator: &str, resolved: bool) -> Dependency {
        Dependency {
            locator: locator.parse().unwrap(),
            resolved,
            metadata: None,
        }
    }

    pub(crate) fn analysis(name: &str, dependencies: Vec<Dependency>) -> Analysis {
        Analysis {
            module: Module {
                name: name.to_string(),
                kind: None,
                target: None,
            },
            dependencies,
        }
    }

    fn resolved_deps(n: usize) -> Vec<Dependency> {
        (0..n)
            .map(|i| dep(&format!("npm+pkg{}$1.0.{}", i, i), true))
            .collect()
    }

    #[tokio::test]
    async fn test_call_count_is_ceil_of_pages() {
        for (len, expected) in [(0, 0), (1, 1), (19, 1), (20, 1), (21, 2), (40, 2)] {
            let api = FakeApi::default();
            let analyses = vec![analysis("app", resolved_deps(len))];
            let records = BatchFetcher::default()
                .fetch_all(&api, &analyses, &mut Silent)
                .await
                .unwrap();
            assert_eq!(api.calls(), expected, "locator count {}", len);
            assert_eq!(records.len(), len);
        }
    }

    #[tokio::test]
    async fn test_page_indices_restart_per_page() {
        let api = FakeApi::default();
        let analyses = vec![analysis("app", resolved_deps(3))];
        BatchFetcher::new(2)
            .unwrap()
            .fetch_all(&api, &analyses, &mut Silent)
            .await
            .unwrap();

        let queries = api.queries.lock().unwrap();
        assert_eq!(
            queries[0],
            "locator[0]=npm%2Bpkg0%241.0.0&locator[1]=npm%2Bpkg1%241.0.1"
        );
        assert_eq!(queries[1], "locator[0]=npm%2Bpkg2%241.0.2");
    }

    #[tokio::test]
    async fn test_aggregation_preserves_page_order() {
        let api = FakeApi::default();
        let analyses = vec![
            analysis("a", vec![dep("npm+A$1", true), dep("npm+B$1", true)]),
            analysis("b", vec![dep("npm+C$1", true)]),
        ];
        let records = BatchFetcher::new(2)
            .unwrap()
            .fetch_all(&api, &analyses, &mut Silent)
            .await
            .unwrap();

        let packages: Vec<_> = records.iter().map(|r| r.loc.package.as_str()).collect();
        assert_eq!(packages, vec!["npm%2BA%241", "npm%2BB%241", "npm%2BC%241"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_fetched_twice() {
        let api = FakeApi::default();
        let analyses = vec![
            analysis("a", vec![dep("npm+lodash$4.0.0", true)]),
            analysis("b", vec![dep("npm+lodash$4.0.0", true)]),
        ];
        let records = BatchFetcher::default()
            .fetch_all(&api, &analyses, &mut Silent)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_unresolved_skipped_but_counted_in_total() {
        let api = FakeApi::default();
        let analyses = vec![analysis(
            "app",
            vec![
                dep("npm+a$1", true),
                dep("npm+b$1", false),
                dep("npm+c$1", true),
            ],
        )];
        let mut progress = RecordingProgress::default();
        let records = BatchFetcher::new(2)
            .unwrap()
            .fetch_all(&api, &analyses, &mut progress)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(api.calls(), 1);
        assert_eq!(
            progress.messages,
            vec![
                "Loading licenses...".to_string(),
                "Loading licenses (2/3 done)...".to_string(),
            ]
        );
        assert_eq!(progress.starts, progress.stops);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_with_page_locators() {
        let api = FakeApi {
            fail_on: Some(0),
            ..Default::default()
        };
        let analyses = vec![analysis("app", resolved_deps(3))];
        let mut progress = RecordingProgress::default();
        let err = BatchFetcher::new(2)
            .unwrap()
            .fetch_all(&api, &analyses, &mut progress)
            .await
            .unwrap_err();

        match err {
            ReportError::Fetch { locators, .. } => {
                assert_eq!(locators, vec!["npm%2Bpkg0%241.0.0", "npm%2Bpkg1%241.0.1"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(api.calls(), 1);
        assert_eq!(progress.starts, progress.stops);
    }

    #[tokio::test]
    async fn test_malformed_response_is_parse_error() {
        let api = FakeApi {
            malformed_on: Some(1),
            ..Default::default()
        };
        let analyses = vec![analysis("app", resolved_deps(5))];
        let err = BatchFetcher::new(2)
            .unwrap()
            .fetch_all(&api, &analyses, &mut Silent)
            .await
            .unwrap_err();

        match err {
            ReportError::Parse { locators, .. } => {
                assert_eq!(locators, vec!["npm%2Bpkg2%241.0.2", "npm%2Bpkg3%241.0.3"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(api.calls(), 2);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            BatchFetcher::new(0),
            Err(ReportError::InvalidPageSize)
        ));
    }
}
