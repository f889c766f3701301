//! The two resolution passes: the content-addressed gadget scan over the
//! code region and the exact-name export lookup.

use std::io;

use sha2::{Digest, Sha256};

use crate::catalog::{ExportSymbol, GadgetSymbol, SymbolCatalog};
use crate::image::{CodeRegion, Export};
use crate::report::{Reporter, ReportSummary};

/// Fixed instruction width of the target architecture. Gadget windows only
/// start on these boundaries.
pub const INSTRUCTION_ALIGNMENT: usize = 4;

/// Outcome of resolving one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved { label: String, address: u64 },
    /// `detail` carries the identifying data (name, or digest and size) so
    /// the failure can be reproduced from the diagnostic alone.
    Unresolved { label: String, detail: String },
}

/// Apply the caller-wide address offset with two's-complement wrapping, so a
/// negative offset relocates downward.
pub fn apply_offset(address: u64, offset: i64) -> u64 {
    address.wrapping_add_signed(offset)
}

/// Scan the code region for the lowest instruction-aligned window whose
/// SHA-256 digest matches the gadget's. First match wins; multiple
/// byte-identical occurrences are never reported as ambiguous.
///
/// A gadget larger than the whole region is unresolved without any
/// comparisons. A gadget exactly as large as the region is compared once,
/// at offset 0.
pub fn resolve_gadget(region: &CodeRegion, gadget: &GadgetSymbol, offset: i64) -> Resolution {
    let bytes = &region.bytes;
    if gadget.size <= bytes.len() {
        let mut i = 0;
        while i + gadget.size <= bytes.len() {
            let digest = Sha256::digest(&bytes[i..i + gadget.size]);
            if digest.as_slice() == gadget.digest.as_slice() {
                return Resolution::Resolved {
                    label: gadget.label.clone(),
                    address: apply_offset(region.base + i as u64, offset),
                };
            }
            i += INSTRUCTION_ALIGNMENT;
        }
    }
    Resolution::Unresolved { label: gadget.label.clone(), detail: gadget.describe() }
}

/// Look up an export by exact, case-sensitive name. Names are assumed unique
/// per well-formed image; with duplicates the first entry wins.
pub fn resolve_export(exports: &[Export], symbol: &ExportSymbol, offset: i64) -> Resolution {
    match exports.iter().find(|e| e.name == symbol.name) {
        Some(entry) => Resolution::Resolved {
            label: symbol.label.clone(),
            address: apply_offset(entry.address, offset),
        },
        None => Resolution::Unresolved { label: symbol.label.clone(), detail: symbol.describe() },
    }
}

/// Resolve a whole catalog against one image, streaming results into the
/// reporter as they are produced: first every gadget in catalog order, then
/// every export in catalog order. A symbol that fails to resolve never
/// aborts the run.
pub fn resolve_catalog<W: io::Write, D: io::Write>(
    catalog: &SymbolCatalog,
    code: &CodeRegion,
    exports: &[Export],
    offset: i64,
    reporter: &mut Reporter<W, D>,
) -> io::Result<ReportSummary> {
    for gadget in catalog.gadgets() {
        reporter.emit(&resolve_gadget(code, gadget, offset))?;
    }
    for symbol in catalog.exports() {
        reporter.emit(&resolve_export(exports, symbol, offset))?;
    }
    Ok(reporter.summary())
}
