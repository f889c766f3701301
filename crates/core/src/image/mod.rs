//! Binary image accessors: the executable code region and the export table.
//!
//! The resolvers only need two things from an image: a flat byte buffer for
//! the code section together with its load base address, and a list of
//! (exported name, address) pairs. This module produces both from an ELF
//! file via `goblin`. Exports are the defined global (or weak) symbols,
//! taken from `.dynsym` when the image has one and from `.symtab` otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use goblin::elf::section_header::{SHF_EXECINSTR, SHN_UNDEF, SHT_PROGBITS};
use goblin::elf::sym::{STB_GLOBAL, STB_WEAK};
use goblin::elf::{Elf, SectionHeader};
use thiserror::Error;

/// The loaded, executable portion of a binary image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRegion {
    /// Raw section bytes. Read-only during resolution.
    pub bytes: Vec<u8>,
    /// Load base address of the first byte.
    pub base: u64,
}

impl CodeRegion {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One entry of the export table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub name: String,
    pub address: u64,
}

/// Everything the resolvers need from one parsed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    pub code: CodeRegion,
    pub exports: Vec<Export>,
}

/// Errors raised while loading an image. All of these are fatal: resolution
/// never starts against partially loaded or substituted data.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse image {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: goblin::error::Error,
    },
    #[error("Image {path} has no executable code section")]
    NoCodeSection { path: PathBuf },
    #[error("Code section of {path} lies outside the file bounds")]
    TruncatedSection { path: PathBuf },
    #[error("Image {path} has no symbol table to read exports from")]
    NoExportTable { path: PathBuf },
}

/// Load the code region and export table from an ELF image on disk.
pub fn load_image(path: &Path) -> Result<BinaryImage, ImageError> {
    let data = fs::read(path)
        .map_err(|source| ImageError::Io { path: path.to_path_buf(), source })?;
    let elf = Elf::parse(&data)
        .map_err(|source| ImageError::Parse { path: path.to_path_buf(), source })?;

    let section = find_code_section(&elf)
        .ok_or_else(|| ImageError::NoCodeSection { path: path.to_path_buf() })?;
    let range = section
        .file_range()
        .filter(|r| r.end <= data.len())
        .ok_or_else(|| ImageError::TruncatedSection { path: path.to_path_buf() })?;
    let code = CodeRegion { bytes: data[range].to_vec(), base: section.sh_addr };

    let exports = collect_exports(&elf)
        .ok_or_else(|| ImageError::NoExportTable { path: path.to_path_buf() })?;

    Ok(BinaryImage { code, exports })
}

/// Pick the executable PROGBITS section, preferring one named `.text`.
fn find_code_section<'a>(elf: &'a Elf) -> Option<&'a SectionHeader> {
    let mut fallback = None;
    for section in &elf.section_headers {
        if section.sh_type != SHT_PROGBITS {
            continue;
        }
        if section.sh_flags & u64::from(SHF_EXECINSTR) == 0 {
            continue;
        }
        let name = elf.shdr_strtab.get_at(section.sh_name).unwrap_or("");
        if name == ".text" {
            return Some(section);
        }
        if fallback.is_none() {
            fallback = Some(section);
        }
    }
    fallback
}

/// Harvest defined global/weak named symbols. Returns `None` when the image
/// carries no symbol table at all, which callers treat as fatal.
fn collect_exports(elf: &Elf) -> Option<Vec<Export>> {
    let (symtab, strtab) = if !elf.dynsyms.is_empty() {
        (&elf.dynsyms, &elf.dynstrtab)
    } else if !elf.syms.is_empty() {
        (&elf.syms, &elf.strtab)
    } else {
        return None;
    };

    let mut exports = Vec::new();
    for sym in symtab.iter() {
        if sym.st_shndx == SHN_UNDEF as usize {
            continue;
        }
        let bind = sym.st_bind();
        if bind != STB_GLOBAL && bind != STB_WEAK {
            continue;
        }
        let Some(name) = strtab.get_at(sym.st_name) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        exports.push(Export { name: name.to_string(), address: sym.st_value });
    }
    Some(exports)
}
