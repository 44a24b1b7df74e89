//! Method registry
//!
//! Indexes the function-kind descriptors of a parsed document by canonical
//! signature and by bare name. Overloaded names must be disambiguated with a
//! full signature; a bare-name lookup that matches several functions is an
//! [`ConsoleError::AmbiguousOperation`].

use crate::parser::{parse_descriptor, OperationDescriptor, OperationKind};
use abiconsole_runtime::{ConsoleError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    /// `view` / `pure`: a direct query, no signing capability needed
    Read,
    /// `nonpayable` / `payable`: a state-changing submission
    Write,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<OperationDescriptor>,
    functions: Vec<usize>,
    by_signature: HashMap<String, usize>,
    by_name: HashMap<String, Vec<usize>>,
}

impl OperationClass {
    pub fn of(descriptor: &OperationDescriptor) -> Self {
        if descriptor.mutability.is_read_only() {
            Self::Read
        } else {
            Self::Write
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl Registry {
    /// Parses `document` and builds a registry, failing as a whole on any
    /// malformed record.
    pub fn from_document(document: &str) -> Result<Self> {
        parse_descriptor(document).map(Self::from_descriptors)
    }

    pub fn from_descriptors(descriptors: Vec<OperationDescriptor>) -> Self {
        let mut functions = Vec::new();
        let mut by_signature = HashMap::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if !descriptor.is_function() {
                continue;
            }
            let signature = descriptor.signature();
            if by_signature.contains_key(&signature) {
                warn!(%signature, "duplicate function signature, keeping first declaration");
                continue;
            }
            by_signature.insert(signature, index);
            by_name.entry(descriptor.name.clone()).or_default().push(index);
            functions.push(index);
        }

        debug!(
            descriptors = descriptors.len(),
            functions = functions.len(),
            "built method registry"
        );

        Self { descriptors, functions, by_signature, by_name }
    }

    /// Every parsed record, including non-actionable kinds
    pub fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    /// Function-kind descriptors in declaration order
    pub fn functions(&self) -> impl Iterator<Item = &OperationDescriptor> + '_ {
        self.functions.iter().map(move |&i| &self.descriptors[i])
    }

    pub fn errors(&self) -> impl Iterator<Item = &OperationDescriptor> + '_ {
        self.descriptors.iter().filter(|d| d.kind == OperationKind::Error)
    }

    pub fn events(&self) -> impl Iterator<Item = &OperationDescriptor> + '_ {
        self.descriptors.iter().filter(|d| d.kind == OperationKind::Event)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Looks up a function by canonical signature or by unambiguous bare name.
    pub fn lookup(&self, key: &str) -> Result<&OperationDescriptor> {
        if let Some(&index) = self.by_signature.get(key) {
            return Ok(&self.descriptors[index]);
        }

        match self.by_name.get(key).map(Vec::as_slice) {
            Some([index]) => Ok(&self.descriptors[*index]),
            Some(candidates) if !candidates.is_empty() => Err(ConsoleError::AmbiguousOperation {
                name: key.to_string(),
                candidates: candidates.iter().map(|&i| self.descriptors[i].signature()).collect(),
            }),
            _ => Err(ConsoleError::unknown_operation(key)),
        }
    }

    pub fn classify(&self, key: &str) -> Result<OperationClass> {
        self.lookup(key).map(OperationClass::of)
    }

    /// The key under which a function's inputs are stored: its bare name when
    /// unique, its full signature when overloaded.
    pub fn operation_key(&self, descriptor: &OperationDescriptor) -> String {
        match self.by_name.get(&descriptor.name) {
            Some(indices) if indices.len() > 1 => descriptor.signature(),
            _ => descriptor.name.clone(),
        }
    }

    /// Finds the error declaration whose selector matches `selector`.
    pub fn error_by_selector(&self, selector: [u8; 4]) -> Option<&OperationDescriptor> {
        self.errors().find(|e| e.selector() == selector)
    }
}
