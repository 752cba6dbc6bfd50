use anyhow::{Context, Result};
use std::io::Write;
use tabwriter::TabWriter;

use crate::model::{RenderOptions, Report};

const COLUMN_PADDING: usize = 3;

/// Columns are separated by at least three spaces and the last column is
/// never padded.
pub fn render(report: &Report, options: &RenderOptions) -> Result<String> {
    if report.is_empty() {
        return Ok(match options.scope.namespace() {
            None => "No resources found\n".to_string(),
            Some(namespace) => format!("No resources found in {namespace} namespace\n"),
        });
    }

    let mut buffer = Vec::new();
    let mut writer = TabWriter::new(&mut buffer)
        .minwidth(0)
        .padding(COLUMN_PADDING);

    if !options.no_headers {
        let mut headers = Vec::with_capacity(report.headers.len() + 1);
        if options.scope.is_all() {
            headers.push("NAMESPACE");
        }
        headers.extend(report.headers.iter().map(String::as_str));
        writeln!(writer, "{}", headers.join("\t")).context("failed to write table header")?;
    }

    for row in &report.rows {
        writeln!(writer, "{}", row.join("\t")).context("failed to write table row")?;
    }

    writer.flush().context("failed to flush result table")?;
    drop(writer);

    String::from_utf8(buffer).context("result table is not valid UTF-8")
}
