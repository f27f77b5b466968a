//! Accessor generation: a getter and a setter per struct field.

use serde::Serialize;

use crate::error::{GenError, Result};
use crate::naming::{capital_case, small_case};
use crate::scan::{FieldSpec, StructDecl};

/// Go keywords, which cannot be used as receiver names.
const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Getter and setter synthesized for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorPair {
    pub field: FieldSpec,
    pub getter_name: String,
    /// Getter signature after the name, e.g. `() int`.
    pub getter_signature: String,
    pub setter_name: String,
    /// Setter signature after the name, e.g. `(X int) *Point`.
    pub setter_signature: String,
}

impl AccessorPair {
    /// Build the pair for `field` of `owner`.
    pub fn for_field(owner: &str, field: &FieldSpec) -> Self {
        let capitalized = capital_case(&field.name);
        Self {
            getter_name: capitalized.clone(),
            getter_signature: format!("() {}", field.declared_type),
            setter_name: format!("Set{}", capitalized),
            setter_signature: format!("({} {}) *{}", field.name, field.declared_type, owner),
            field: field.clone(),
        }
    }
}

/// All accessor pairs of one struct type, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorGroup {
    pub owner_type_name: String,
    /// Receiver variable used in the generated methods.
    pub receiver_name: String,
    pub pairs: Vec<AccessorPair>,
}

/// Generate accessor groups for the scanned structs, preserving order.
pub fn generate_accessors(structs: &[StructDecl]) -> Result<Vec<AccessorGroup>> {
    structs.iter().map(generate_group).collect()
}

fn generate_group(decl: &StructDecl) -> Result<AccessorGroup> {
    if decl.fields.is_empty() {
        return Err(GenError::Extraction(format!(
            "struct {} has no fields",
            decl.name
        )));
    }
    if let Some(stray) = decl.fields.iter().find(|f| f.owner_type_name != decl.name) {
        return Err(GenError::Extraction(format!(
            "field {} belongs to {}, not {}",
            stray.name, stray.owner_type_name, decl.name
        )));
    }

    let pairs = decl
        .fields
        .iter()
        .map(|field| AccessorPair::for_field(&decl.name, field))
        .collect();

    Ok(AccessorGroup {
        owner_type_name: decl.name.clone(),
        receiver_name: receiver_name(&decl.name, &decl.fields),
        pairs,
    })
}

/// Pick a receiver name that is neither a keyword nor a field name.
///
/// Prefers the small-cased type name, then its first letter.
pub fn receiver_name(type_name: &str, fields: &[FieldSpec]) -> String {
    let usable = |name: &str| {
        !name.is_empty()
            && !GO_KEYWORDS.contains(&name)
            && !fields.iter().any(|f| f.name == name)
    };

    let full = small_case(type_name);
    if usable(&full) {
        return full;
    }
    let initial: String = full.chars().take(1).collect();
    if usable(&initial) {
        return initial;
    }
    let mut fallback = "recv".to_string();
    while !usable(&fallback) {
        fallback.push('_');
    }
    fallback
}
