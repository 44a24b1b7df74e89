//! Input state store
//!
//! Raw argument text per operation key and positional slot. Values are not
//! validated here; coercion happens when an invocation is dispatched.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputStore {
    slots: HashMap<String, Vec<String>>,
    fees: HashMap<String, String>,
}

impl InputStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text at `index` for `operation`, creating the buffer on
    /// first edit.
    pub fn set_slot(&mut self, operation: &str, index: usize, value: impl Into<String>) {
        let slots = self.slots.entry(operation.to_string()).or_default();
        if slots.len() <= index {
            slots.resize(index + 1, String::new());
        }
        slots[index] = value.into();
    }

    pub fn slot(&self, operation: &str, index: usize) -> &str {
        self.slots
            .get(operation)
            .and_then(|slots| slots.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Exactly `arity` values, with unset slots as empty strings.
    pub fn args(&self, operation: &str, arity: usize) -> Vec<String> {
        (0..arity).map(|index| self.slot(operation, index).to_string()).collect()
    }

    pub fn set_fee(&mut self, operation: &str, value: impl Into<String>) {
        self.fees.insert(operation.to_string(), value.into());
    }

    pub fn clear_fee(&mut self, operation: &str) {
        self.fees.remove(operation);
    }

    /// Fee text for `operation`; blank text counts as unset
    pub fn fee(&self, operation: &str) -> Option<&str> {
        self.fees.get(operation).map(String::as_str).filter(|fee| !fee.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.fees.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.fees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_padded_to_arity() {
        let mut store = InputStore::new();
        store.set_slot("verifyLeaf", 1, "0xab");
        assert_eq!(store.args("verifyLeaf", 2), vec!["".to_string(), "0xab".to_string()]);
    }

    #[test]
    fn test_args_truncated_to_arity() {
        let mut store = InputStore::new();
        store.set_slot("owner", 3, "ignored");
        assert!(store.args("owner", 0).is_empty());
    }

    #[test]
    fn test_round_trip_slot() {
        let mut store = InputStore::new();
        store.set_slot("updateFee", 0, "100");
        store.set_slot("updateFee", 0, "250");
        assert_eq!(store.args("updateFee", 1)[0], "250");
    }

    #[test]
    fn test_unknown_operation_defaults_to_empty() {
        let store = InputStore::new();
        assert_eq!(store.args("shards", 1), vec![String::new()]);
    }

    #[test]
    fn test_blank_fee_is_unset() {
        let mut store = InputStore::new();
        store.set_fee("revealEntropy", "  ");
        assert_eq!(store.fee("revealEntropy"), None);
        store.set_fee("revealEntropy", "1000");
        assert_eq!(store.fee("revealEntropy"), Some("1000"));
    }

    #[test]
    fn test_clear() {
        let mut store = InputStore::new();
        store.set_slot("a", 0, "1");
        store.set_fee("a", "1");
        store.clear();
        assert!(store.is_empty());
    }
}
