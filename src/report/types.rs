use std::collections::BTreeMap;
use std::time::Duration;

/// Outcome of one case execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportResult {
    pub suite: String,
    pub name: String,
    pub api: String,
    pub method: String,
    pub duration: Duration,
    /// Status of the response, when one arrived.
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ReportResult {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate of every execution that hit the same API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSummary {
    pub api: String,
    pub count: u32,
    pub average: Duration,
    pub max: Duration,
    pub min: Duration,
    pub errors: u32,
}

#[derive(Default)]
struct SummaryAcc {
    count: u32,
    total: Duration,
    max: Duration,
    min: Option<Duration>,
    errors: u32,
}

/// Groups results per API, in order of first appearance.
#[must_use]
pub fn summarize(results: &[ReportResult]) -> Vec<ApiSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, SummaryAcc> = BTreeMap::new();
    for result in results {
        let acc = groups.entry(result.api.as_str()).or_insert_with(|| {
            order.push(result.api.as_str());
            SummaryAcc::default()
        });
        acc.count = acc.count.saturating_add(1);
        acc.total = acc.total.saturating_add(result.duration);
        acc.max = acc.max.max(result.duration);
        acc.min = Some(acc.min.map_or(result.duration, |min| min.min(result.duration)));
        if result.is_error() {
            acc.errors = acc.errors.saturating_add(1);
        }
    }

    order
        .into_iter()
        .filter_map(|api| {
            let acc = groups.remove(api)?;
            Some(ApiSummary {
                api: api.to_owned(),
                count: acc.count,
                average: acc.total.checked_div(acc.count).unwrap_or_default(),
                max: acc.max,
                min: acc.min.unwrap_or_default(),
                errors: acc.errors,
            })
        })
        .collect()
}
