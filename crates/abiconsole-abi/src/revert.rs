//! Human-readable diagnostics for revert data

use crate::codec::decode;
use crate::registry::Registry;
use crate::value::render;
use alloy_sol_types::{Panic, Revert, SolError};

/// Renders revert data as the most specific message available: a revert
/// reason, a panic code, a custom error declared in `registry`, or raw hex.
pub fn describe_revert(data: &[u8], registry: &Registry) -> String {
    if data.is_empty() {
        return "execution reverted".to_string();
    }

    if let Ok(revert) = Revert::abi_decode(data, true) {
        return format!("execution reverted: {}", revert.reason);
    }

    if let Ok(panic) = Panic::abi_decode(data, true) {
        let reason = panic.kind().map(|kind| kind.as_str()).unwrap_or("unknown panic");
        return format!("panic 0x{:02x}: {}", panic.code, reason);
    }

    if data.len() >= 4 {
        let selector = [data[0], data[1], data[2], data[3]];
        if let Some(error) = registry.error_by_selector(selector) {
            if let Ok(values) = decode(&error.input_types(), &data[4..]) {
                let rendered: Vec<String> = values.iter().map(render).collect();
                return format!("execution reverted: {}({})", error.name, rendered.join(", "));
            }
        }
    }

    format!("execution reverted with data 0x{}", hex::encode(data))
}
