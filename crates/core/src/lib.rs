//! ropsym-core
//!
//! Core library for resolving symbolic addresses inside binary images for
//! ROP-chain construction.
//!
//! This crate defines the wanted-symbol catalog (with its YAML decoding and
//! validation), the binary-image accessors for the code region and export
//! table, the two resolution passes (content-addressed gadget scan and
//! exact-name export lookup), and the report emitter.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, scripting bindings, etc.).

pub mod catalog;
pub mod image;
pub mod report;
pub mod resolve;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
