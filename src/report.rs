use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::TestResult;
use crate::runner::Branch;

const RULE_WIDTH: usize = 80;
const SAMPLE_PREVIEW_CHARS: usize = 200;

/// Aggregate counts over a results list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage, rounded to one decimal place. 0.0 for an empty run.
    pub success_rate: f64,
    pub branch: Option<Branch>,
    /// False when the protected endpoints were only probed for 401s.
    pub authenticated_coverage: bool,
}

impl Summary {
    pub fn from_results(results: &[TestResult], branch: Option<Branch>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.success()).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            (passed as f64 / total as f64 * 1000.0).round() / 10.0
        };
        Self {
            total,
            passed,
            failed: total - passed,
            success_rate,
            branch,
            authenticated_coverage: branch == Some(Branch::Authenticated),
        }
    }
}

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn rule(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn write_banner(out: &mut dyn Write, api_base: &str) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "AS WE ALL ARE - Backend API Contract Check")?;
    rule(out)?;
    writeln!(out, "Testing API at: {}", api_base)?;
    writeln!(out)
}

pub fn write_result(out: &mut dyn Write, result: &TestResult) -> io::Result<()> {
    let status = if result.success() {
        "✅ PASS"
    } else {
        "❌ FAIL"
    };
    writeln!(out, "{}: {}", status, result.name())?;
    writeln!(out, "   Message: {}", result.message())?;
    if let Some(sample) = result.sampled_response() {
        let pretty = serde_json::to_string_pretty(sample).unwrap_or_else(|_| sample.to_string());
        writeln!(
            out,
            "   Response: {}...",
            truncate_chars(&pretty, SAMPLE_PREVIEW_CHARS)
        )?;
    }
    writeln!(out)
}

pub fn write_unauthorized_notice(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "⚠️  Testing authenticated endpoints without session to verify authorization handling"
    )?;
    writeln!(out)
}

pub fn write_summary(
    out: &mut dyn Write,
    summary: &Summary,
    results: &[TestResult],
) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "TEST SUMMARY")?;
    rule(out)?;
    writeln!(out, "Total Tests: {}", summary.total)?;
    writeln!(out, "Passed: {}", summary.passed)?;
    writeln!(out, "Failed: {}", summary.failed)?;
    writeln!(out, "Success Rate: {:.1}%", summary.success_rate)?;

    match summary.branch {
        Some(Branch::Authenticated) => writeln!(out, "Branch: authenticated session")?,
        Some(Branch::Unauthorized) => {
            writeln!(out, "Branch: unauthorized probes")?;
            writeln!(
                out,
                "⚠️  Authenticated endpoints were NOT exercised in this run (no session was established)"
            )?;
        }
        None => {}
    }

    writeln!(out)?;
    writeln!(out, "Failed Tests:")?;
    for r in results.iter().filter(|r| !r.success()) {
        writeln!(out, "  ❌ {}: {}", r.name(), r.message())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    api_base: &'a str,
    summary: &'a Summary,
    results: &'a [TestResult],
}

/// Write results and summary as pretty JSON.
pub fn write_json_report(
    path: &Path,
    api_base: &str,
    summary: &Summary,
    results: &[TestResult],
) -> Result<()> {
    let report = JsonReport {
        api_base,
        summary,
        results,
    };
    let bytes = serde_json::to_vec_pretty(&report).context("serialize report")?;
    std::fs::write(path, bytes).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
