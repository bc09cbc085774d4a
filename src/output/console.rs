//! Console report generation
//!
//! This module renders checked links as indented text: one block per parent
//! page, followed by grand totals. Labels and totals are colored through
//! `colored`, which honors `NO_COLOR` and `colored::control::set_override`.

use crate::output::stats::PageTally;
use crate::output::traits::Reporter;
use crate::state::{CheckOutcome, PageResults, ResultItem};
use colored::{ColoredString, Colorize};

const LABEL_WIDTH: usize = 7;

/// Prints the report to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    type Output = ();

    fn process(&self, pages: &PageResults) {
        print!("{}", format_console_report(pages));
    }
}

/// Formats checked links as a console report
///
/// Skipped links are counted in the totals but not listed.
///
/// # Example output
///
/// ```text
/// https://example.com/
///     OK      : https://example.com/about
///     BROKEN  : https://example.com/missing (404)
///     OK: 1, retried: 0, skipped: 0, broken: 1
/// OK: 1, retried: 0, skipped: 0, broken: 1
/// ```
pub fn format_console_report(pages: &PageResults) -> String {
    let mut out = String::new();

    for (parent, items) in pages.iter() {
        out.push_str(parent);
        out.push('\n');

        for item in items {
            if item.outcome != CheckOutcome::Skipped {
                out.push_str(&format_check(item));
            }
        }

        out.push('\t');
        out.push_str(&format_totals(&PageTally::of(items)));
    }

    out.push_str(&format_totals(&PageTally::of_run(pages)));
    out
}

/// Padded, colored status label for an outcome
fn label(outcome: CheckOutcome) -> ColoredString {
    let text = match outcome {
        CheckOutcome::NonSuccessCode | CheckOutcome::GenericError => "BROKEN",
        other => other.label(),
    };
    let padded = format!("{:<width$}", text, width = LABEL_WIDTH);

    match outcome {
        CheckOutcome::Ok => padded.green(),
        CheckOutcome::Retried | CheckOutcome::Timeout => padded.yellow(),
        CheckOutcome::Skipped => padded.bright_black(),
        CheckOutcome::NonSuccessCode | CheckOutcome::GenericError => padded.red(),
    }
}

fn format_check(item: &ResultItem) -> String {
    match &item.message {
        Some(message) => format!(
            "\t{} : {} ({})\n",
            label(item.outcome),
            item.url.italic(),
            message.italic().bright_black()
        ),
        None => format!("\t{} : {}\n", label(item.outcome), item.url.italic()),
    }
}

fn format_totals(tally: &PageTally) -> String {
    format!(
        "{}, {}, {}, {}\n",
        format!("OK: {}", tally.ok).green(),
        format!("retried: {}", tally.retried).yellow(),
        format!("skipped: {}", tally.skipped).bright_black(),
        format!("broken: {}", tally.broken).red()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SEED_PARENT;
    use colored::Color;

    /// Renders without escape codes
    fn plain_report(pages: &PageResults) -> String {
        colored::control::set_override(false);
        format_console_report(pages)
    }

    fn sample_pages() -> PageResults {
        vec![
            (
                SEED_PARENT,
                vec![ResultItem::new("https://original.com/", CheckOutcome::Ok)],
            ),
            (
                "https://original.com/",
                vec![
                    ResultItem::new("https://original.com/success", CheckOutcome::Ok),
                    ResultItem::with_message(
                        "https://original.com/not-found",
                        CheckOutcome::NonSuccessCode,
                        "404",
                    ),
                    ResultItem::new("https://original.com/timeout", CheckOutcome::Timeout),
                    ResultItem::new("https://original.com/failure", CheckOutcome::GenericError),
                    ResultItem::with_message(
                        "https://original.com/retried",
                        CheckOutcome::Retried,
                        "2",
                    ),
                    ResultItem::new("https://original.com/", CheckOutcome::Skipped),
                    ResultItem::new("https://external.com/to-skip", CheckOutcome::Skipped),
                ],
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parent_headers_present() {
        let report = plain_report(&sample_pages());
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines.contains(&SEED_PARENT));
        assert!(lines.contains(&"https://original.com/"));
    }

    #[test]
    fn test_check_lines() {
        let report = plain_report(&sample_pages());

        assert!(report.contains("\tOK      : https://original.com/success\n"));
        assert!(report.contains("\tBROKEN  : https://original.com/not-found (404)\n"));
        assert!(report.contains("\tTIMEOUT : https://original.com/timeout\n"));
        assert!(report.contains("\tBROKEN  : https://original.com/failure\n"));
        assert!(report.contains("\tRETRIED : https://original.com/retried (2)\n"));
    }

    #[test]
    fn test_skipped_not_listed() {
        let report = plain_report(&sample_pages());
        assert!(!report.contains("to-skip"));
        assert!(!report.contains("SKIP"));
    }

    #[test]
    fn test_totals() {
        let report = plain_report(&sample_pages());
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines.contains(&"\tOK: 1, retried: 0, skipped: 0, broken: 0"));
        assert!(lines.contains(&"\tOK: 1, retried: 1, skipped: 2, broken: 3"));
        assert_eq!(
            lines.last(),
            Some(&"OK: 2, retried: 1, skipped: 2, broken: 3")
        );
    }

    #[test]
    fn test_empty_report() {
        let report = plain_report(&PageResults::new());
        assert_eq!(report, "OK: 0, retried: 0, skipped: 0, broken: 0\n");
    }

    #[test]
    fn test_label_colors() {
        assert_eq!(label(CheckOutcome::Ok).fgcolor(), Some(Color::Green));
        assert_eq!(label(CheckOutcome::Timeout).fgcolor(), Some(Color::Yellow));
        assert_eq!(label(CheckOutcome::Retried).fgcolor(), Some(Color::Yellow));
        assert_eq!(label(CheckOutcome::Skipped).fgcolor(), Some(Color::BrightBlack));
        assert_eq!(label(CheckOutcome::NonSuccessCode).fgcolor(), Some(Color::Red));
        assert_eq!(label(CheckOutcome::GenericError).fgcolor(), Some(Color::Red));
    }

    #[test]
    fn test_labels_padded_before_coloring() {
        assert_eq!(&*label(CheckOutcome::Ok), "OK     ");
        assert_eq!(&*label(CheckOutcome::GenericError), "BROKEN ");
        assert_eq!(&*label(CheckOutcome::Timeout), "TIMEOUT");
    }

    #[test]
    fn test_plain_report_has_no_escape_codes() {
        let report = plain_report(&sample_pages());
        assert!(!report.contains('\u{1b}'));
    }
}
