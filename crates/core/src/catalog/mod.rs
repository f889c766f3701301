//! Wanted-symbol catalog: data model, YAML decoding, and boundary validation.
//!
//! A catalog is an ordered list of symbols the caller wants resolved against
//! a binary image. Each entry is either an export (looked up by exact name)
//! or a gadget (looked up by the SHA-256 digest of its machine-code bytes).
//! Order is preserved because it determines report order; duplicate entries
//! are legal and each produces its own report line.
//!
//! All structural validation happens here, at load time. The resolvers can
//! assume every gadget carries a full 32-byte digest and a positive size.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// SHA-256 output length in bytes.
pub const DIGEST_LEN: usize = 32;

/// A symbol resolved by exact exported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSymbol {
    /// Output identifier, emitted verbatim in the report (e.g. `$ROP_memcpy`).
    pub label: String,
    /// Exact, case-sensitive name to look up in the export table.
    pub name: String,
}

impl ExportSymbol {
    /// Identifying detail for diagnostics, without the label.
    pub fn describe(&self) -> String {
        format!("export \"{}\"", self.name)
    }
}

/// A symbol resolved by scanning the code region for a byte run with a known
/// SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GadgetSymbol {
    /// Output identifier, emitted verbatim in the report.
    pub label: String,
    /// Expected SHA-256 digest of the gadget's machine-code bytes.
    pub digest: [u8; DIGEST_LEN],
    /// Exact byte length of the gadget. Always positive.
    pub size: usize,
}

impl GadgetSymbol {
    /// Lowercase hex rendering of the expected digest.
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Identifying detail for diagnostics, without the label.
    pub fn describe(&self) -> String {
        format!("gadget sha256={} size=0x{:X}", self.digest_hex(), self.size)
    }
}

/// A wanted symbol, dispatched by kind during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Export(ExportSymbol),
    Gadget(GadgetSymbol),
}

impl Symbol {
    pub fn label(&self) -> &str {
        match self {
            Symbol::Export(s) => &s.label,
            Symbol::Gadget(g) => &g.label,
        }
    }
}

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Symbol {label}: exactly one of `name` or `hash` must be set")]
    AmbiguousKind { label: String },
    #[error("Symbol {label}: gadget entry is missing `size`")]
    MissingSize { label: String },
    #[error("Symbol {label}: gadget size must be greater than zero")]
    ZeroSize { label: String },
    #[error("Symbol {label}: digest must be {expected} hex characters, got {got}", expected = 2 * DIGEST_LEN)]
    DigestLength { label: String, got: usize },
    #[error("Symbol {label}: digest contains non-hex character {found:?}")]
    DigestNotHex { label: String, found: char },
}

/// Raw catalog shape as it appears in the YAML document.
///
/// Kind is inferred from which identifying field is present: `name` for
/// exports, `hash` (+ `size`) for gadgets. An entry carrying both, or
/// neither, is rejected during validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    symbols: Vec<RawSymbol>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSymbol {
    out: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    size: Option<usize>,
}

/// Ordered sequence of wanted symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Build a catalog from already-typed symbols, enforcing the gadget-size
    /// invariant that YAML loading enforces.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self, CatalogError> {
        for symbol in &symbols {
            if let Symbol::Gadget(g) = symbol {
                if g.size == 0 {
                    return Err(CatalogError::ZeroSize { label: g.label.clone() });
                }
            }
        }
        Ok(Self { symbols })
    }

    /// Decode and validate a catalog from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_yaml::from_str(text)?;
        let mut symbols = Vec::with_capacity(raw.symbols.len());
        for entry in raw.symbols {
            symbols.push(validate_entry(entry)?);
        }
        Ok(Self { symbols })
    }

    /// Read and decode a catalog from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&text)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Gadget symbols, in catalog order.
    pub fn gadgets(&self) -> impl Iterator<Item = &GadgetSymbol> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Gadget(g) => Some(g),
            Symbol::Export(_) => None,
        })
    }

    /// Export symbols, in catalog order.
    pub fn exports(&self) -> impl Iterator<Item = &ExportSymbol> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Export(e) => Some(e),
            Symbol::Gadget(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn validate_entry(entry: RawSymbol) -> Result<Symbol, CatalogError> {
    let RawSymbol { out, name, hash, size } = entry;
    match (name, hash) {
        (Some(name), None) => Ok(Symbol::Export(ExportSymbol { label: out, name })),
        (None, Some(hash)) => {
            let digest = decode_digest(&out, &hash)?;
            let size = size.ok_or_else(|| CatalogError::MissingSize { label: out.clone() })?;
            if size == 0 {
                return Err(CatalogError::ZeroSize { label: out });
            }
            Ok(Symbol::Gadget(GadgetSymbol { label: out, digest, size }))
        }
        _ => Err(CatalogError::AmbiguousKind { label: out }),
    }
}

/// Decode a 64-character hex string into a 32-byte digest. Accepts both
/// uppercase and lowercase digits, matching the catalogs in the wild.
fn decode_digest(label: &str, hex: &str) -> Result<[u8; DIGEST_LEN], CatalogError> {
    if hex.chars().count() != 2 * DIGEST_LEN {
        return Err(CatalogError::DigestLength { label: label.to_string(), got: hex.chars().count() });
    }
    let mut digest = [0u8; DIGEST_LEN];
    let mut chars = hex.chars();
    for byte in digest.iter_mut() {
        let hi = hex_value(label, chars.next().unwrap_or('\0'))?;
        let lo = hex_value(label, chars.next().unwrap_or('\0'))?;
        *byte = (hi << 4) | lo;
    }
    Ok(digest)
}

fn hex_value(label: &str, c: char) -> Result<u8, CatalogError> {
    c.to_digit(16)
        .map(|v| v as u8)
        .ok_or_else(|| CatalogError::DigestNotHex { label: label.to_string(), found: c })
}
