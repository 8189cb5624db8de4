//! Text views over a finished [`QaReport`].
//!
//! Pure formatting. Nothing here recomputes a score or a pass flag.

use contentgate_core::{QaReport, Severity};
use std::fmt::Write;

fn status(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

/// One-line summary, e.g. `FAIL 0.72 (12 items) cta=FAIL duplicates=PASS ...`.
pub fn summary_line(report: &QaReport) -> String {
    let mut line = format!(
        "{} {:.2} ({} item{})",
        status(report.overall_pass),
        report.composite_score,
        report.item_count,
        if report.item_count == 1 { "" } else { "s" }
    );
    for result in report.results() {
        let _ = write!(line, " {}={}", result.analyzer.as_str(), status(result.passed));
    }
    line
}

/// Markdown rendering of the whole report.
pub fn render_markdown(report: &QaReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Content QA Report\n");
    let _ = writeln!(
        out,
        "**Result:** {}  \n**Composite score:** {:.2}  \n**Items:** {}\n",
        status(report.overall_pass),
        report.composite_score,
        report.item_count
    );

    let _ = writeln!(out, "| Analyzer | Result | Score | Metric |");
    let _ = writeln!(out, "|---|---|---|---|");
    for result in report.results() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {} |",
            result.analyzer.as_str(),
            status(result.passed),
            result.score,
            result.metric
        );
    }

    if !report.duplicates.pairs.is_empty() {
        let _ = writeln!(
            out,
            "\n## Duplicate hooks ({})\n",
            report.duplicates.algorithm.as_str()
        );
        for pair in &report.duplicates.pairs {
            let _ = writeln!(
                out,
                "- #{} / #{} ({:.2}): \"{}\" / \"{}\"",
                pair.index_a, pair.index_b, pair.similarity, pair.label_a, pair.label_b
            );
        }
    }

    if !report.cta.distribution.is_empty() {
        let _ = writeln!(out, "\n## CTA distribution\n");
        for (category, count) in &report.cta.distribution {
            let _ = writeln!(out, "- {}: {}", category, count);
        }
    }

    for result in report.results() {
        if result.issues.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n## {} issues\n", result.analyzer.as_str());
        for issue in &result.issues {
            let at = match issue.position {
                Some(position) => format!("item #{}", position),
                None => "batch".to_string(),
            };
            let _ = writeln!(
                out,
                "- [{}] {}: {}",
                severity_label(issue.severity),
                at,
                issue.message
            );
        }
    }

    out
}
