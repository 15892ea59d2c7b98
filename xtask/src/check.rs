use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{run_step, Step};

const HOST_STEPS: &[Step] = &[
    Step::required("Checking workspace (host)", &["check", "--workspace", "--all-targets"]),
    Step::required(
        "Checking i2s-stream with defmt",
        &["check", "-p", "i2s-stream", "--features", "defmt"],
    ),
    Step::required(
        "Checking i2s-stream with tracing",
        &["check", "-p", "i2s-stream", "--features", "tracing", "--all-targets"],
    ),
    Step::required(
        "Checking platform mocks",
        &["check", "-p", "platform", "--features", "std"],
    ),
];

// The lx106 target ships only with the Espressif toolchain.
const XTENSA_STEP: Step = Step::required(
    "Checking firmware for ESP8266",
    &[
        "+esp",
        "check",
        "-p",
        "firmware",
        "--features",
        "hardware",
        "--target",
        "xtensa-esp8266-none-elf",
        "-Zbuild-std=core,alloc",
    ],
);

const LINT_STEPS: &[Step] = &[
    Step::advisory(
        "Running clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    ),
    Step::advisory("Checking code formatting", &["fmt", "--all", "--check"]),
];

pub fn run(xtensa: bool) -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in HOST_STEPS {
        run_step(step)?;
    }
    if xtensa {
        run_step(&XTENSA_STEP)?;
    } else {
        println!("{}", "  ⚠ Skipping ESP8266 check (pass --xtensa)".yellow());
    }
    for step in LINT_STEPS {
        run_step(step)?;
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
