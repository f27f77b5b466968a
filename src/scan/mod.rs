//! Declaration scanner.
//!
//! Walks the top-level declarations of parsed Go files and emits plain
//! records: one `MethodSignature` per method with a receiver and one
//! `StructDecl` per non-empty struct type, both subject to a `TypeFilter`.
//! Function bodies are never entered.

mod filter;

pub use filter::TypeFilter;

use serde::Serialize;
use tree_sitter::Node;

use crate::naming::{embedded_field_name, is_identifier};
use crate::parser::{ParsedFile, SourcePackage};

/// A method declared on a named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Parenthesized parameter list, e.g. `(things ...string)`.
    pub parameters: String,
    /// Result type or parenthesized result list; empty when there is none.
    pub results: String,
    /// Receiver type with any pointer marker stripped.
    pub owner_type_name: String,
    /// Whether the receiver was declared as a pointer.
    pub has_pointer_receiver: bool,
}

impl MethodSignature {
    /// Signature text following the method name, e.g. `(i int) *Bar`.
    pub fn signature(&self) -> String {
        if self.results.is_empty() {
            self.parameters.clone()
        } else {
            format!("{} {}", self.parameters, self.results)
        }
    }
}

/// One field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type as written, with whitespace collapsed.
    pub declared_type: String,
    pub owner_type_name: String,
    /// Position within the struct, starting at 0.
    pub declaration_order: usize,
}

/// A struct type declaration with at least one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

/// Records emitted for one package, in scan order.
#[derive(Debug, Clone, Default)]
pub struct ScanRecords {
    pub methods: Vec<MethodSignature>,
    pub structs: Vec<StructDecl>,
}

/// Scan every file of a package in path order.
pub fn scan_package(package: &SourcePackage, filter: &TypeFilter) -> ScanRecords {
    let mut records = ScanRecords::default();
    for file in &package.files {
        scan_file(file, filter, &mut records);
    }
    tracing::debug!(
        package = %package.name,
        methods = records.methods.len(),
        structs = records.structs.len(),
        "scanned package"
    );
    records
}

/// Scan the top-level declarations of one file, appending to `records`.
pub fn scan_file(file: &ParsedFile, filter: &TypeFilter, records: &mut ScanRecords) {
    let root = file.tree.root_node();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "method_declaration" => {
                if let Some(method) = scan_method(file, node) {
                    if filter.allows(&method.owner_type_name) {
                        records.methods.push(method);
                    }
                }
            }
            "type_declaration" => scan_type_declaration(file, node, filter, records),
            _ => {}
        }
    }
}

fn scan_method(file: &ParsedFile, node: Node) -> Option<MethodSignature> {
    let receiver = node.child_by_field_name("receiver")?;
    let name = node.child_by_field_name("name")?;
    let parameters = node.child_by_field_name("parameters")?;

    let mut cursor = receiver.walk();
    let receiver_type = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?
        .child_by_field_name("type")?;
    let (owner_type_name, has_pointer_receiver) =
        normalize_receiver(file.node_text(receiver_type));
    if !is_identifier(&owner_type_name) {
        // Generic receivers such as `*List[T]` cannot name an interface.
        tracing::warn!(
            receiver = %owner_type_name,
            method = file.node_text(name),
            path = %file.path.display(),
            "skipping method on unsupported receiver"
        );
        return None;
    }

    let results = match node.child_by_field_name("result") {
        Some(result) if result.kind() == "parameter_list" => render_parameter_list(file, result),
        Some(result) => render_type(file, result),
        None => String::new(),
    };

    Some(MethodSignature {
        name: file.node_text(name).to_string(),
        parameters: render_parameter_list(file, parameters),
        results,
        owner_type_name,
        has_pointer_receiver,
    })
}

fn scan_type_declaration(
    file: &ParsedFile,
    node: Node,
    filter: &TypeFilter,
    records: &mut ScanRecords,
) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        // type_alias nodes (`type A = B`) never declare a struct
        if spec.kind() != "type_spec" {
            continue;
        }
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            continue;
        };
        if ty.kind() != "struct_type" {
            continue;
        }
        let name = file.node_text(name);
        if !filter.allows(name) {
            continue;
        }

        let fields = scan_fields(file, name, ty);
        if fields.is_empty() {
            tracing::trace!(type_name = name, "skipping struct without fields");
            continue;
        }
        records.structs.push(StructDecl {
            name: name.to_string(),
            fields,
        });
    }
}

fn scan_fields(file: &ParsedFile, owner: &str, struct_type: Node) -> Vec<FieldSpec> {
    let mut fields = Vec::new();
    let mut cursor = struct_type.walk();
    let Some(list) = struct_type
        .named_children(&mut cursor)
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut list_cursor = list.walk();
    for decl in list.named_children(&mut list_cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some((names, declared_type)) = field_parts(file, decl) else {
            continue;
        };

        if names.is_empty() {
            let name = embedded_field_name(&declared_type).to_string();
            push_field(&mut fields, owner, name, declared_type);
        } else {
            for name in names {
                if name == "_" {
                    continue;
                }
                push_field(&mut fields, owner, name.to_string(), declared_type.clone());
            }
        }
    }
    fields
}

/// Names and rendered type of a field declaration.
///
/// Embedded fields have no names; their type keeps the pointer marker,
/// which is a sibling token of the type node.
fn field_parts<'a>(file: &'a ParsedFile, decl: Node) -> Option<(Vec<&'a str>, String)> {
    let ty = decl.child_by_field_name("type")?;
    let type_text = render_type(file, ty);

    let mut name_cursor = decl.walk();
    let names: Vec<&str> = decl
        .children_by_field_name("name", &mut name_cursor)
        .map(|n| file.node_text(n))
        .collect();

    if !names.is_empty() {
        return Some((names, type_text));
    }
    let mut token_cursor = decl.walk();
    let pointer = decl.children(&mut token_cursor).any(|n| n.kind() == "*");
    let declared_type = if pointer {
        format!("*{}", type_text)
    } else {
        type_text
    };
    Some((names, declared_type))
}

fn push_field(fields: &mut Vec<FieldSpec>, owner: &str, name: String, declared_type: String) {
    let declaration_order = fields.len();
    fields.push(FieldSpec {
        name,
        declared_type,
        owner_type_name: owner.to_string(),
        declaration_order,
    });
}

/// Strip pointer markers and parentheses from a receiver type.
///
/// Returns the bare type name and whether a pointer marker was present.
pub fn normalize_receiver(text: &str) -> (String, bool) {
    let mut rest = text.trim();
    let mut pointer = false;
    loop {
        if let Some(stripped) = rest.strip_prefix('*') {
            pointer = true;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix('(') {
            rest = stripped.trim_start();
        } else {
            break;
        }
    }
    let rest = rest.trim_end_matches(|c: char| c == ')' || c.is_whitespace());
    (collapse_whitespace(rest), pointer)
}

/// Render a parameter list as `(a, b int, rest ...string)`.
fn render_parameter_list(file: &ParsedFile, list: Node) -> String {
    let mut cursor = list.walk();
    let params: Vec<String> = list
        .named_children(&mut cursor)
        .filter_map(|param| render_parameter(file, param))
        .collect();
    format!("({})", params.join(", "))
}

fn render_parameter(file: &ParsedFile, param: Node) -> Option<String> {
    let variadic = match param.kind() {
        "parameter_declaration" => false,
        "variadic_parameter_declaration" => true,
        _ => return None,
    };
    let ty = render_type(file, param.child_by_field_name("type")?);
    let ty = if variadic { format!("...{}", ty) } else { ty };

    let mut cursor = param.walk();
    let names: Vec<&str> = param
        .children_by_field_name("name", &mut cursor)
        .map(|n| file.node_text(n))
        .collect();

    if names.is_empty() {
        Some(ty)
    } else {
        Some(format!("{} {}", names.join(", "), ty))
    }
}

/// Render a type expression on one line.
///
/// Struct and interface types are rebuilt from their members joined with
/// `"; "`, as in `struct{Host string; Port int}`. Comments are dropped and
/// other whitespace runs collapse to one space.
fn render_type(file: &ParsedFile, node: Node) -> String {
    match node.kind() {
        "struct_type" => render_struct_type(file, node),
        "interface_type" => render_interface_type(file, node),
        _ => {
            let mut out = String::new();
            let mut offset = node.start_byte();
            splice_members(file, node, &mut offset, &mut out);
            push_collapsed(&mut out, file.source_text(offset, node.end_byte()));
            out.trim().to_string()
        }
    }
}

/// Copy text up to each nested struct, interface or comment, replacing
/// those nodes with their one-line rendering.
fn splice_members(file: &ParsedFile, node: Node, offset: &mut usize, out: &mut String) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "struct_type" | "interface_type" | "comment" => {
                push_collapsed(out, file.source_text(*offset, child.start_byte()));
                if child.kind() != "comment" {
                    out.push_str(&render_type(file, child));
                }
                *offset = child.end_byte();
            }
            _ => splice_members(file, child, offset, out),
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

fn render_struct_type(file: &ParsedFile, node: Node) -> String {
    let mut members = Vec::new();
    let mut cursor = node.walk();
    for list in node.named_children(&mut cursor) {
        if list.kind() != "field_declaration_list" {
            continue;
        }
        let mut list_cursor = list.walk();
        for decl in list.named_children(&mut list_cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some((names, declared_type)) = field_parts(file, decl) else {
                continue;
            };
            let mut member = if names.is_empty() {
                declared_type
            } else {
                format!("{} {}", names.join(", "), declared_type)
            };
            if let Some(tag) = decl.child_by_field_name("tag") {
                member.push(' ');
                member.push_str(file.node_text(tag));
            }
            members.push(member);
        }
    }
    format!("struct{{{}}}", members.join("; "))
}

fn render_interface_type(file: &ParsedFile, node: Node) -> String {
    let mut members = Vec::new();
    let mut cursor = node.walk();
    for member in node.named_children(&mut cursor) {
        match member.kind() {
            "comment" => {}
            "method_elem" | "method_spec" => {
                let Some(name) = member.child_by_field_name("name") else {
                    continue;
                };
                let mut text = file.node_text(name).to_string();
                if let Some(params) = member.child_by_field_name("parameters") {
                    text.push_str(&render_parameter_list(file, params));
                }
                match member.child_by_field_name("result") {
                    Some(result) if result.kind() == "parameter_list" => {
                        text.push(' ');
                        text.push_str(&render_parameter_list(file, result));
                    }
                    Some(result) => {
                        text.push(' ');
                        text.push_str(&render_type(file, result));
                    }
                    None => {}
                }
                members.push(text);
            }
            _ => members.push(render_type(file, member)),
        }
    }
    format!("interface{{{}}}", members.join("; "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
