//! Solidity `interface` export

use abiconsole_abi::{canonical, DynSolType, Mutability, OperationDescriptor, Param, Registry};

/// Renders the registry's errors, events and functions as a Solidity interface.
///
/// Tuple types are emitted as numbered structs declared at the top of the
/// interface.
pub fn export_solidity(name: &str, registry: &Registry) -> String {
    let mut structs = StructTable::default();
    let mut body = Vec::new();

    for error in registry.errors() {
        body.push(format!("    error {}({});", error.name, param_list(&error.inputs, None, &mut structs)));
    }
    for event in registry.events() {
        body.push(format!("    event {}({});", event.name, param_list(&event.inputs, None, &mut structs)));
    }
    for function in registry.functions() {
        body.push(function_line(function, &mut structs));
    }

    let mut out = format!("// SPDX-License-Identifier: MIT\npragma solidity ^0.8.0;\n\ninterface {} {{\n", name);
    for (index, fields) in structs.defs.iter().enumerate() {
        out.push_str(&format!("    struct Struct{} {{\n", index));
        for field in fields {
            out.push_str(&format!("        {};\n", field));
        }
        out.push_str("    }\n\n");
    }
    for line in body {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn function_line(function: &OperationDescriptor, structs: &mut StructTable) -> String {
    let mut line = format!(
        "    function {}({}) external",
        function.name,
        param_list(&function.inputs, Some("calldata"), structs)
    );
    match function.mutability {
        Mutability::Nonpayable => {}
        other => {
            line.push(' ');
            line.push_str(other.as_str());
        }
    }
    if !function.outputs.is_empty() {
        line.push_str(&format!(" returns ({})", param_list(&function.outputs, Some("memory"), structs)));
    }
    line.push(';');
    line
}

fn param_list(params: &[Param], location: Option<&str>, structs: &mut StructTable) -> String {
    params
        .iter()
        .map(|param| {
            let mut decl = structs.type_name(&param.kind, &param.components);
            if let Some(location) = location.filter(|_| needs_location(&param.kind)) {
                decl.push(' ');
                decl.push_str(location);
            }
            if !param.name.is_empty() {
                decl.push(' ');
                decl.push_str(&param.name);
            }
            decl
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn needs_location(ty: &DynSolType) -> bool {
    matches!(
        ty,
        DynSolType::Bytes
            | DynSolType::String
            | DynSolType::Array(_)
            | DynSolType::FixedArray(..)
            | DynSolType::Tuple(_)
    )
}

/// Struct definitions by rendered field list, numbered in first-use order
#[derive(Default)]
struct StructTable {
    defs: Vec<Vec<String>>,
}

impl StructTable {
    /// `components` names the fields of the innermost tuple of `ty`
    fn type_name(&mut self, ty: &DynSolType, components: &[Param]) -> String {
        match ty {
            DynSolType::Tuple(types) => {
                let rendered: Vec<String> = if components.len() == types.len() {
                    components
                        .iter()
                        .enumerate()
                        .map(|(i, f)| {
                            let ty = self.type_name(&f.kind, &f.components);
                            format!("{} {}", ty, field_name(&f.name, i))
                        })
                        .collect()
                } else {
                    types
                        .iter()
                        .enumerate()
                        .map(|(i, t)| format!("{} {}", self.type_name(t, &[]), field_name("", i)))
                        .collect()
                };
                let index = match self.defs.iter().position(|d| *d == rendered) {
                    Some(index) => index,
                    None => {
                        self.defs.push(rendered);
                        self.defs.len() - 1
                    }
                };
                format!("Struct{}", index)
            }
            DynSolType::Array(inner) => format!("{}[]", self.type_name(inner, components)),
            DynSolType::FixedArray(inner, size) => {
                format!("{}[{}]", self.type_name(inner, components), size)
            }
            other => canonical(other),
        }
    }
}

fn field_name(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("field{}", index)
    } else {
        name.to_string()
    }
}
