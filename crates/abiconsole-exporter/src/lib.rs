//! abiconsole Exporter
//!
//! Generates operator-facing documentation from a method registry: a compact
//! per-operation summary and a Solidity `interface` declaration.

pub mod solidity;
pub mod summary;

pub use solidity::export_solidity;
pub use summary::{summarize, summary_line, InterfaceSummary};
