//! Formats resolution results as linker-script style address assignments.
//!
//! Resolved symbols go to one sink as `label = 0xHHHHHHHH;` lines that a
//! downstream linker script or constants file can consume directly.
//! Unresolved symbols go to a separate diagnostic sink.

use std::io;

use crate::resolve::Resolution;

/// Render an address as a `0x`-prefixed, uppercase hex literal, zero-padded
/// to at least 8 digits.
pub fn format_address(address: u64) -> String {
    format!("0x{address:08X}")
}

/// One report line for a resolved symbol, e.g. `$ROP_memcpy = 0x02001A30;`.
pub fn assignment_line(label: &str, address: u64) -> String {
    format!("{label} = {};", format_address(address))
}

/// Counts of how a resolution run went, for the caller's exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub resolved: usize,
    pub unresolved: usize,
}

impl ReportSummary {
    pub fn all_resolved(&self) -> bool {
        self.unresolved == 0
    }
}

/// Streams resolutions to an output sink and a diagnostic sink while
/// tracking counts.
#[derive(Debug)]
pub struct Reporter<W, D> {
    out: W,
    diag: D,
    summary: ReportSummary,
}

impl<W: io::Write, D: io::Write> Reporter<W, D> {
    pub fn new(out: W, diag: D) -> Self {
        Self { out, diag, summary: ReportSummary::default() }
    }

    pub fn emit(&mut self, resolution: &Resolution) -> io::Result<()> {
        match resolution {
            Resolution::Resolved { label, address } => {
                writeln!(self.out, "{}", assignment_line(label, *address))?;
                self.summary.resolved += 1;
            }
            Resolution::Unresolved { label, detail } => {
                writeln!(self.diag, "Not found {label} ({detail})")?;
                self.summary.unresolved += 1;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> ReportSummary {
        self.summary
    }
}
