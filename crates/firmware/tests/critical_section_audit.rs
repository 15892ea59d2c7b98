//! Critical-section audit.
// Audit test file: panic-style asserts are the test mechanism.
#![allow(clippy::panic)]
//!
//! The board's critical section is only compiled for the xtensa target, so
//! these tests check its source and manifest instead. The SLC handler takes
//! a critical section itself; leaving it must put PS back to the handler's
//! level, which needs a saved PS rather than a nesting flag.
//!
//! Run with: cargo test -p firmware --test critical_section_audit

const BOARD_RS: &str = include_str!("../src/board.rs");
const MANIFEST: &str = include_str!("../Cargo.toml");

/// The restore state carries the whole PS register.
#[test]
fn restore_state_is_the_saved_ps() {
    assert!(
        MANIFEST.contains("restore-state-u32"),
        "critical-section must carry the saved PS (restore-state-u32)"
    );
    assert!(
        !MANIFEST.contains("restore-state-bool"),
        "a nesting flag cannot restore an interrupt level"
    );
}

/// `acquire` saves PS while raising the level; `release` writes it back.
#[test]
fn release_writes_back_the_acquired_ps() {
    assert!(BOARD_RS.contains("\"rsil {0}, 15\""));
    assert!(BOARD_RS.contains("\"wsr.ps {0}\""));
    assert!(
        !BOARD_RS.contains("ets_intr_unlock"),
        "ets_intr_unlock drops to level 0 even inside the SLC handler"
    );
}
