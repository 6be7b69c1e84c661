//! Report renderers.
//!
//! - [`dependencies`]: raw dependency lists as one line of JSON, keyed by module.
//! - [`licenses`]: plaintext third-party license notice, grouped by license.

pub mod dependencies;
pub mod licenses;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::api::RevisionApi;
use crate::error::ReportError;
use crate::fetch::BatchFetcher;
use crate::models::Analysis;
use crate::progress::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Licenses,
    Dependencies,
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "licenses" => Ok(ReportType::Licenses),
            "dependencies" => Ok(ReportType::Dependencies),
            other => Err(ReportError::UnknownReportType(other.to_string())),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Licenses => write!(f, "licenses"),
            ReportType::Dependencies => write!(f, "dependencies"),
        }
    }
}

/// Validate `report_type` and `page_size`, then render that report to `out`.
///
/// `connect` is only called for the licenses report, after validation, so a bad
/// report type never reaches the API and the dependencies report never needs one.
pub async fn run<A, C, P, W>(
    report_type: &str,
    page_size: usize,
    analyses: &[Analysis],
    connect: C,
    progress: &mut P,
    out: &mut W,
) -> Result<(), ReportError>
where
    A: RevisionApi,
    C: FnOnce() -> Result<A, ReportError>,
    P: Progress + ?Sized,
    W: Write,
{
    let kind: ReportType = report_type.parse()?;
    let fetcher = BatchFetcher::new(page_size)?;
    tracing::debug!(report = %kind, page_size, modules = analyses.len(), "generating report");

    match kind {
        ReportType::Dependencies => dependencies::render(analyses, out),
        ReportType::Licenses => {
            let api = connect()?;
            generate(kind, analyses, &api, &fetcher, progress, out).await
        }
    }
}

/// Render the requested report to `out`. Only the licenses report queries `api`.
pub async fn generate<A, P, W>(
    kind: ReportType,
    analyses: &[Analysis],
    api: &A,
    fetcher: &BatchFetcher,
    progress: &mut P,
    out: &mut W,
) -> Result<(), ReportError>
where
    A: RevisionApi,
    P: Progress + ?Sized,
    W: Write,
{
    match kind {
        ReportType::Dependencies => dependencies::render(analyses, out),
        ReportType::Licenses => {
            let records = fetcher.fetch_all(api, analyses, progress).await?;
            licenses::render(&records, out)
        }
    }
}
