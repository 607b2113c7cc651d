use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use crate::error::ReportError;

use super::types::{ReportResult, summarize};

/// Renders exported results into a sink.
pub trait ReportResultWriter {
    /// Writes the per-execution table followed by the per-API summary.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink rejects the output.
    fn output(&mut self, results: &[ReportResult]) -> Result<(), ReportError>;
}

fn write_line(output: &mut String, line: &str) -> Result<(), ReportError> {
    writeln!(output, "{}", line).map_err(|err| ReportError::Format { source: err })
}

fn flush_into<W: Write>(sink: &mut W, output: &str) -> Result<(), ReportError> {
    sink.write_all(output.as_bytes())
        .and_then(|()| sink.flush())
        .map_err(|err| ReportError::Write { source: err })
}

fn status_text(result: &ReportResult) -> String {
    result
        .status
        .map_or_else(|| "-".to_owned(), |status| status.to_string())
}

fn format_duration(duration: Duration) -> String {
    format!("{:?}", duration)
}

/// Tab-separated plain text.
#[derive(Debug)]
pub struct PlainResultWriter<W> {
    sink: W,
}

impl<W: Write> PlainResultWriter<W> {
    #[must_use]
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> ReportResultWriter for PlainResultWriter<W> {
    fn output(&mut self, results: &[ReportResult]) -> Result<(), ReportError> {
        let mut output = String::new();
        write_line(&mut output, "Suite\tCase\tMethod\tAPI\tStatus\tDuration\tError")?;
        for result in results {
            write_line(
                &mut output,
                &format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    result.suite,
                    result.name,
                    result.method,
                    result.api,
                    status_text(result),
                    format_duration(result.duration),
                    result.error.as_deref().unwrap_or("-"),
                ),
            )?;
        }

        write_line(&mut output, "")?;
        write_line(&mut output, "API\tCount\tAverage\tMax\tMin\tError")?;
        for summary in summarize(results) {
            write_line(
                &mut output,
                &format!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    summary.api,
                    summary.count,
                    format_duration(summary.average),
                    format_duration(summary.max),
                    format_duration(summary.min),
                    summary.errors,
                ),
            )?;
        }
        flush_into(&mut self.sink, &output)
    }
}

/// Markdown tables.
#[derive(Debug)]
pub struct MarkdownResultWriter<W> {
    sink: W,
}

impl<W: Write> MarkdownResultWriter<W> {
    #[must_use]
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn markdown_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

impl<W: Write> ReportResultWriter for MarkdownResultWriter<W> {
    fn output(&mut self, results: &[ReportResult]) -> Result<(), ReportError> {
        let mut output = String::new();
        write_line(
            &mut output,
            "| Suite | Case | Method | API | Status | Duration | Error |",
        )?;
        write_line(&mut output, "| --- | --- | --- | --- | --- | --- | --- |")?;
        for result in results {
            write_line(
                &mut output,
                &format!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    markdown_cell(&result.suite),
                    markdown_cell(&result.name),
                    markdown_cell(&result.method),
                    markdown_cell(&result.api),
                    status_text(result),
                    format_duration(result.duration),
                    markdown_cell(result.error.as_deref().unwrap_or("")),
                ),
            )?;
        }

        write_line(&mut output, "")?;
        write_line(&mut output, "| API | Count | Average | Max | Min | Error |")?;
        write_line(&mut output, "| --- | --- | --- | --- | --- | --- |")?;
        for summary in summarize(results) {
            write_line(
                &mut output,
                &format!(
                    "| {} | {} | {} | {} | {} | {} |",
                    markdown_cell(&summary.api),
                    summary.count,
                    format_duration(summary.average),
                    format_duration(summary.max),
                    format_duration(summary.min),
                    summary.errors,
                ),
            )?;
        }
        flush_into(&mut self.sink, &output)
    }
}

/// Writes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardResultWriter;

impl ReportResultWriter for DiscardResultWriter {
    fn output(&mut self, _results: &[ReportResult]) -> Result<(), ReportError> {
        Ok(())
    }
}
