//! Running cargo steps with timing and coloured status lines.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// How a failed step affects the task.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    Warn,
}

/// One cargo invocation.
pub struct Step {
    pub label: &'static str,
    pub args: &'static [&'static str],
    pub on_failure: OnFailure,
}

impl Step {
    pub const fn required(label: &'static str, args: &'static [&'static str]) -> Self {
        Self {
            label,
            args,
            on_failure: OnFailure::Abort,
        }
    }

    pub const fn advisory(label: &'static str, args: &'static [&'static str]) -> Self {
        Self {
            label,
            args,
            on_failure: OnFailure::Warn,
        }
    }
}

/// Run `step`, print its outcome, and bail if a required step failed.
///
/// Returns the captured output so callers can pull a test summary out of it.
pub fn run_step(step: &Step) -> Result<Output> {
    println!("{}", format!("  {}...", step.label).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(step.args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", step.args.join(" ")))?;

    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                step.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        return Ok(output);
    }

    match step.on_failure {
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        }
        OnFailure::Warn => {
            eprintln!("{}", format!("  ⚠ {} reported problems", step.label).yellow().bold());
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }
    }
    Ok(output)
}

/// Pull "N passed; M failed; ..." out of libtest output, summed over every
/// test binary in it.
pub fn test_summary(output: &str) -> String {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut binaries = 0usize;
    for line in output.lines() {
        let Some(rest) = line.split("test result:").nth(1) else {
            continue;
        };
        binaries += 1;
        for part in rest.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let count: usize = count.parse().unwrap_or(0);
            match kind {
                "passed" => passed += count,
                "failed" => failed += count,
                _ => {}
            }
        }
    }
    if binaries == 0 {
        return "(summary not available)".to_string();
    }
    format!("({passed} passed, {failed} failed across {binaries} binaries)")
}
