//! Result collection and report rendering.
mod reporter;
mod types;
mod writer;


pub use reporter::{DiscardReporter, MemoryReporter, TestReporter};
pub use types::{ApiSummary, ReportResult, summarize};
pub use writer::{
    DiscardResultWriter, MarkdownResultWriter, PlainResultWriter, ReportResultWriter,
};
