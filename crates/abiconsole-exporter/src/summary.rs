//! Interface summary generation
//!
//! Projects the function-kind subset of a [`Registry`] into one
//! `name(param: type, ...): effect` line per operation, in registry order.
//! The summary is documentation only and never consulted by dispatch.

use abiconsole_abi::{Mutability, OperationDescriptor, Param, Registry};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceSummary {
    lines: Vec<String>,
}

impl InterfaceSummary {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Wraps the lines in a named interface block.
    pub fn render_block(&self, name: &str) -> String {
        let mut out = format!("interface {} {{\n", name);
        for line in &self.lines {
            out.push_str("  ");
            out.push_str(line);
            out.push_str(";\n");
        }
        out.push('}');
        out
    }
}

impl fmt::Display for InterfaceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

pub fn summarize(registry: &Registry) -> InterfaceSummary {
    InterfaceSummary { lines: registry.functions().map(summary_line).collect() }
}

pub fn summary_line(operation: &OperationDescriptor) -> String {
    let params: Vec<String> = operation
        .inputs
        .iter()
        .enumerate()
        .map(|(index, param)| format!("{}: {}", param_label(param, index), param.canonical()))
        .collect();

    format!("{}({}): {}", operation.name, params.join(", "), effect(operation.mutability))
}

fn param_label(param: &Param, index: usize) -> String {
    if param.name.is_empty() {
        format!("arg{}", index)
    } else {
        param.name.clone()
    }
}

fn effect(mutability: Mutability) -> &'static str {
    match mutability {
        Mutability::Pure | Mutability::View => "read",
        Mutability::Nonpayable => "write",
        Mutability::Payable => "write, payable",
    }
}
