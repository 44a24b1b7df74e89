//! Parameter type model
//!
//! Every `type` tag of an interface descriptor is resolved once, at parse
//! time, into alloy's closed [`DynSolType`]. Encoding, decoding and argument
//! coercion all dispatch on that type instead of re-reading type strings.
//! [`Param`] carries the declared names next to it, including tuple field
//! names, which a [`DynSolType`] does not keep.

use abiconsole_runtime::{ConsoleError, Result};
use alloy_dyn_abi::{DynSolType, Specifier};
use alloy_json_abi::{EventParam, Param as JsonParam};

/// Size in bytes of one ABI word
pub const WORD: usize = 32;

/// Largest encoding, in words, a single declared type may require.
///
/// Fixed arrays multiply their element size, so a few nested dimensions are
/// enough to describe values no contract could ever return.
pub const MAX_TYPE_WORDS: usize = 1 << 16;

/// A named, typed parameter slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub kind: DynSolType,
    /// Named fields when `kind` is a tuple or an array of tuples
    pub components: Vec<Param>,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: DynSolType) -> Self {
        Self { name: name.into(), kind, components: Vec::new() }
    }

    pub fn with_components(mut self, components: Vec<Param>) -> Self {
        self.components = components;
        self
    }

    /// Canonical type string as used in function signatures
    pub fn canonical(&self) -> String {
        canonical(&self.kind)
    }

    pub(crate) fn from_json(param: &JsonParam) -> Result<Self> {
        let components = param.components.iter().map(Self::from_json).collect::<Result<Vec<_>>>()?;
        resolved(&param.name, &param.ty, param.resolve(), components)
    }

    pub(crate) fn from_event(param: &EventParam) -> Result<Self> {
        let components = param.components.iter().map(Self::from_json).collect::<Result<Vec<_>>>()?;
        resolved(&param.name, &param.ty, param.resolve(), components)
    }
}

fn resolved(
    name: &str,
    tag: &str,
    kind: alloy_dyn_abi::Result<DynSolType>,
    components: Vec<Param>,
) -> Result<Param> {
    if tag.starts_with("tuple") && components.is_empty() {
        return Err(ConsoleError::malformed_descriptor(format!(
            "tuple parameter '{}' has no components",
            name
        )));
    }
    let kind = kind.map_err(|e| {
        ConsoleError::malformed_descriptor(format!("unsupported parameter type '{}': {}", tag, e))
    })?;
    check_type(&kind).map_err(ConsoleError::malformed_descriptor)?;
    Ok(Param { name: name.to_string(), kind, components })
}

/// Canonical type string, e.g. `(bytes,uint64)[]`
pub fn canonical(ty: &DynSolType) -> String {
    ty.sol_type_name().into_owned()
}

/// Parses a standalone type tag such as `uint256`, `address[3]` or
/// `(bytes,uint64)[]`.
pub fn parse_type(tag: &str) -> Result<DynSolType> {
    let ty = DynSolType::parse(tag.trim()).map_err(|e| {
        ConsoleError::malformed_descriptor(format!("unsupported parameter type '{}': {}", tag, e))
    })?;
    check_type(&ty).map_err(ConsoleError::malformed_descriptor)?;
    Ok(ty)
}

/// Rejects types the console cannot carry: odd integer widths, function
/// pointers, empty fixed arrays and anything whose encoding would exceed
/// [`MAX_TYPE_WORDS`].
pub(crate) fn check_type(ty: &DynSolType) -> std::result::Result<(), String> {
    match ty {
        DynSolType::Uint(bits) | DynSolType::Int(bits)
            if *bits == 0 || *bits > 256 || bits % 8 != 0 =>
        {
            return Err(format!("invalid integer width in '{}'", canonical(ty)));
        }
        DynSolType::FixedBytes(size) if *size == 0 || *size > WORD => {
            return Err(format!("invalid fixed bytes size in '{}'", canonical(ty)));
        }
        DynSolType::Function => return Err("function pointers are not supported".to_string()),
        DynSolType::Array(inner) => check_type(inner)?,
        DynSolType::FixedArray(inner, size) => {
            if *size == 0 {
                return Err(format!("zero-length array in '{}'", canonical(ty)));
            }
            check_type(inner)?;
        }
        DynSolType::Tuple(fields) => fields.iter().try_for_each(check_type)?,
        _ => {}
    }

    match slot_words(ty) {
        Some(words) if words <= MAX_TYPE_WORDS => Ok(()),
        _ => Err(format!("type '{}' is too large", canonical(ty))),
    }
}

/// Fewest words a valid encoding of `ty` occupies on its own: the head of a
/// static type, or the tail of a dynamic one. `None` on overflow.
pub(crate) fn min_words(ty: &DynSolType) -> Option<usize> {
    match ty {
        DynSolType::FixedArray(inner, size) => slot_words(inner)?.checked_mul(*size),
        DynSolType::Tuple(fields) => {
            fields.iter().try_fold(0usize, |acc, f| acc.checked_add(slot_words(f)?))
        }
        // scalars, and the length word of bytes, strings and arrays
        _ => Some(1),
    }
}

/// Words `ty` needs inside an enclosing sequence, counting the head offset
/// of dynamic types.
fn slot_words(ty: &DynSolType) -> Option<usize> {
    let own = min_words(ty)?;
    if ty.is_dynamic() {
        own.checked_add(1)
    } else {
        Some(own)
    }
}
