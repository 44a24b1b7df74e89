//! Parser for interface descriptor (ABI) documents

use crate::types::Param;
use abiconsole_runtime::{ConsoleError, Result};
use alloy_dyn_abi::DynSolType;
use alloy_json_abi::{
    Constructor, Error as ErrorItem, Event, Fallback, Function, Receive, StateMutability,
};
use alloy_primitives::keccak256;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Function,
    Constructor,
    Event,
    Error,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

/// One callable-operation record, normalized from the descriptor document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub name: String,
    pub mutability: Mutability,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
}

impl OperationKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "function" => Some(Self::Function),
            "constructor" => Some(Self::Constructor),
            "event" => Some(Self::Event),
            "error" => Some(Self::Error),
            "fallback" => Some(Self::Fallback),
            "receive" => Some(Self::Receive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Constructor => "constructor",
            Self::Event => "event",
            Self::Error => "error",
            Self::Fallback => "fallback",
            Self::Receive => "receive",
        }
    }
}

impl Mutability {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pure" => Some(Self::Pure),
            "view" => Some(Self::View),
            "nonpayable" => Some(Self::Nonpayable),
            "payable" => Some(Self::Payable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pure => "pure",
            Self::View => "view",
            Self::Nonpayable => "nonpayable",
            Self::Payable => "payable",
        }
    }

    /// `view` and `pure` operations never change durable state
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Pure | Self::View)
    }
}

impl From<StateMutability> for Mutability {
    fn from(tag: StateMutability) -> Self {
        match tag {
            StateMutability::Pure => Self::Pure,
            StateMutability::View => Self::View,
            StateMutability::NonPayable => Self::Nonpayable,
            StateMutability::Payable => Self::Payable,
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperationDescriptor {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(Param::canonical).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First four bytes of the keccak-256 hash of the signature
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    pub fn is_function(&self) -> bool {
        self.kind == OperationKind::Function
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn input_types(&self) -> Vec<DynSolType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    pub fn output_types(&self) -> Vec<DynSolType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }
}

/// Parses a descriptor document into operation descriptors in declaration order.
///
/// The whole document is rejected if any record is malformed; no partial
/// list is ever returned.
pub fn parse_descriptor(document: &str) -> Result<Vec<OperationDescriptor>> {
    let records: Vec<Value> = serde_json::from_str(document).map_err(|e| {
        ConsoleError::malformed_descriptor(format!("document is not a list of records: {}", e))
    })?;

    let descriptors = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            parse_record(record).map_err(|e| match e {
                ConsoleError::MalformedDescriptor(msg) => {
                    ConsoleError::malformed_descriptor(format!("record {}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(records = descriptors.len(), "parsed interface descriptor");
    Ok(descriptors)
}

fn parse_record(mut record: Value) -> Result<OperationDescriptor> {
    let fields = record
        .as_object_mut()
        .ok_or_else(|| ConsoleError::malformed_descriptor("record is not an object"))?;
    let tag = match fields.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        Some(_) => return Err(ConsoleError::malformed_descriptor("'type' is not a string")),
        None => return Err(ConsoleError::malformed_descriptor("missing required 'type'")),
    };
    let kind = OperationKind::from_tag(&tag)
        .ok_or_else(|| ConsoleError::malformed_descriptor(format!("unknown type '{}'", tag)))?;

    let named = matches!(kind, OperationKind::Function | OperationKind::Event | OperationKind::Error);
    if named && !matches!(fields.get("name"), Some(Value::String(name)) if !name.is_empty()) {
        return Err(ConsoleError::malformed_descriptor(format!("{} without a name", tag)));
    }
    if let Some(state) = fields.get("stateMutability") {
        if state.as_str().and_then(Mutability::from_tag).is_none() {
            return Err(ConsoleError::malformed_descriptor(format!(
                "unknown stateMutability {}",
                state
            )));
        }
    }
    fill_defaults(kind, fields);

    match kind {
        OperationKind::Function => {
            let item: Function = deserialize_item(record, &tag)?;
            Ok(OperationDescriptor {
                kind,
                name: item.name,
                mutability: item.state_mutability.into(),
                inputs: params(&item.inputs)?,
                outputs: params(&item.outputs)?,
            })
        }
        OperationKind::Constructor => {
            let item: Constructor = deserialize_item(record, &tag)?;
            Ok(unnamed(kind, item.state_mutability, params(&item.inputs)?))
        }
        OperationKind::Fallback => {
            let item: Fallback = deserialize_item(record, &tag)?;
            Ok(unnamed(kind, item.state_mutability, Vec::new()))
        }
        OperationKind::Receive => {
            let item: Receive = deserialize_item(record, &tag)?;
            Ok(unnamed(kind, item.state_mutability, Vec::new()))
        }
        OperationKind::Event => {
            let item: Event = deserialize_item(record, &tag)?;
            Ok(OperationDescriptor {
                kind,
                name: item.name,
                mutability: Mutability::Nonpayable,
                inputs: item.inputs.iter().map(Param::from_event).collect::<Result<_>>()?,
                outputs: Vec::new(),
            })
        }
        OperationKind::Error => {
            let item: ErrorItem = deserialize_item(record, &tag)?;
            Ok(OperationDescriptor {
                kind,
                name: item.name,
                mutability: Mutability::Nonpayable,
                inputs: params(&item.inputs)?,
                outputs: Vec::new(),
            })
        }
    }
}

/// Supplies the fields a hand-written or legacy record may leave out.
///
/// An absent `stateMutability` selects the write path unless the legacy
/// `payable`/`constant` flags say otherwise.
fn fill_defaults(kind: OperationKind, fields: &mut Map<String, Value>) {
    if !matches!(kind, OperationKind::Event | OperationKind::Error)
        && !fields.contains_key("stateMutability")
    {
        let state = if kind == OperationKind::Receive || flag(fields, "payable") {
            "payable"
        } else if flag(fields, "constant") {
            "view"
        } else {
            "nonpayable"
        };
        fields.insert("stateMutability".to_string(), Value::from(state));
    }

    if !matches!(kind, OperationKind::Fallback | OperationKind::Receive) {
        fields.entry("inputs").or_insert_with(|| Value::Array(Vec::new()));
    }
    if kind == OperationKind::Function {
        fields.entry("outputs").or_insert_with(|| Value::Array(Vec::new()));
    }
    if kind == OperationKind::Event {
        fields.entry("anonymous").or_insert(Value::Bool(false));
        if let Some(Value::Array(inputs)) = fields.get_mut("inputs") {
            for input in inputs.iter_mut().filter_map(Value::as_object_mut) {
                input.entry("indexed").or_insert(Value::Bool(false));
            }
        }
    }
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key) == Some(&Value::Bool(true))
}

fn deserialize_item<T: DeserializeOwned>(record: Value, tag: &str) -> Result<T> {
    serde_json::from_value(record)
        .map_err(|e| ConsoleError::malformed_descriptor(format!("invalid {} record: {}", tag, e)))
}

fn params(raw: &[alloy_json_abi::Param]) -> Result<Vec<Param>> {
    raw.iter().map(Param::from_json).collect()
}

fn unnamed(kind: OperationKind, state: StateMutability, inputs: Vec<Param>) -> OperationDescriptor {
    OperationDescriptor {
        kind,
        name: String::new(),
        mutability: state.into(),
        inputs,
        outputs: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mutability_defaults_to_nonpayable() {
        let doc = r#"[{"type": "function", "name": "poke", "inputs": []}]"#;
        let parsed = parse_descriptor(doc).unwrap();
        assert_eq!(parsed[0].mutability, Mutability::Nonpayable);
        assert!(!parsed[0].mutability.is_read_only());
    }

    #[test]
    fn test_selector_of_known_signature() {
        let doc = r#"[{"type": "function", "name": "transfer",
            "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}]}]"#;
        let parsed = parse_descriptor(doc).unwrap();
        assert_eq!(parsed[0].signature(), "transfer(address,uint256)");
        assert_eq!(parsed[0].selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_legacy_flags_select_mutability() {
        let doc = r#"[
            {"type": "function", "name": "fund", "payable": true, "inputs": []},
            {"type": "function", "name": "peek", "constant": true, "inputs": []}
        ]"#;
        let parsed = parse_descriptor(doc).unwrap();
        assert_eq!(parsed[0].mutability, Mutability::Payable);
        assert_eq!(parsed[1].mutability, Mutability::View);
    }

    #[test]
    fn test_receive_is_payable() {
        let parsed = parse_descriptor(r#"[{"type": "receive"}]"#).unwrap();
        assert_eq!(parsed[0].kind, OperationKind::Receive);
        assert_eq!(parsed[0].mutability, Mutability::Payable);
    }

    #[test]
    fn test_error_names_offending_record() {
        let doc = r#"[{"type": "function", "name": "a"}, {"name": "b"}]"#;
        let err = parse_descriptor(doc).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }
}
