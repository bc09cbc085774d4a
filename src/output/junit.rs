//! JUnit-style XML report generation
//!
//! Each parent page becomes a `testsuite` and each link checked on it a
//! `testcase`, so CI systems can display broken links as failed tests.

use crate::output::stats::PageTally;
use crate::output::traits::{OutputError, OutputResult, Reporter};
use crate::state::{CheckOutcome, PageResults, ResultItem};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Renders the report and optionally writes it to a file
#[derive(Debug, Clone, Default)]
pub struct JunitReporter {
    path: Option<PathBuf>,
}

impl JunitReporter {
    /// Creates a reporter that writes the document to `path`
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Creates a reporter that only returns the rendered document
    pub fn in_memory() -> Self {
        Self { path: None }
    }
}

impl Reporter for JunitReporter {
    type Output = OutputResult<String>;

    fn process(&self, pages: &PageResults) -> OutputResult<String> {
        let xml = format_junit_report(pages, &Utc::now())?;
        if let Some(path) = &self.path {
            write_junit_report(&xml, path)?;
        }
        Ok(xml)
    }
}

/// Writes a rendered document to disk
///
/// # Arguments
///
/// * `xml` - The rendered document
/// * `output_path` - Path where the file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn write_junit_report(xml: &str, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)
        .map_err(|e| OutputError::Write(format!("{}: {}", output_path.display(), e)))?;
    file.write_all(xml.as_bytes())?;
    Ok(())
}

/// Formats checked links as a JUnit XML document
///
/// Attribute values are escaped, and characters XML 1.0 cannot carry at all
/// are replaced with U+FFFD.
///
/// # Arguments
///
/// * `pages` - Checked links grouped by parent page
/// * `timestamp` - Stamped on every test suite
pub fn format_junit_report(pages: &PageResults, timestamp: &DateTime<Utc>) -> OutputResult<String> {
    let stamp = timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("testsuites")))?;

    for (parent, items) in pages.iter() {
        let tally = PageTally::of(items);
        let parent = xml_safe(parent);
        let tests = tally.total().to_string();
        let failures = tally.broken.to_string();
        let skipped = tally.skipped.to_string();

        let mut suite = BytesStart::new("testsuite");
        suite.push_attribute(("name", &*parent));
        suite.push_attribute(("tests", tests.as_str()));
        suite.push_attribute(("failures", failures.as_str()));
        suite.push_attribute(("skipped", skipped.as_str()));
        suite.push_attribute(("time", "0.0000"));
        suite.push_attribute(("timestamp", stamp.as_str()));
        writer.write_event(Event::Start(suite))?;

        for item in items {
            write_testcase(&mut writer, &parent, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| OutputError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_testcase(writer: &mut Writer<Vec<u8>>, parent: &str, item: &ResultItem) -> OutputResult<()> {
    let url = xml_safe(&item.url);
    let mut testcase = BytesStart::new("testcase");
    testcase.push_attribute(("name", &*url));
    testcase.push_attribute(("classname", parent));
    testcase.push_attribute(("time", "0.0000"));

    let child = match item.outcome {
        CheckOutcome::Ok | CheckOutcome::Retried => None,
        CheckOutcome::Skipped => Some(BytesStart::new("skipped")),
        CheckOutcome::Timeout => Some(failure("Timeout")),
        CheckOutcome::NonSuccessCode => Some(failure(item.message.as_deref().unwrap_or(""))),
        CheckOutcome::GenericError => {
            Some(failure(item.message.as_deref().unwrap_or("Unknown error")))
        }
    };

    match child {
        Some(child) => {
            writer.write_event(Event::Start(testcase))?;
            writer.write_event(Event::Empty(child))?;
            writer.write_event(Event::End(BytesEnd::new("testcase")))?;
        }
        None => writer.write_event(Event::Empty(testcase))?,
    }
    Ok(())
}

fn failure(message: &str) -> BytesStart<'static> {
    let mut failure = BytesStart::new("failure");
    failure.push_attribute(("message", &*xml_safe(message)));
    failure
}

/// Replaces characters outside the XML 1.0 `Char` production
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
