//! Renderer: turns a derived model into Go declaration text.
//!
//! Rendering is template driven and deterministic. Interfaces are emitted in
//! derived-name order with methods sorted by name; accessor groups keep the
//! order in which their structs were scanned, and pairs keep field order.
//! The output is not formatted here; see `crate::format`.

use std::collections::BTreeSet;
use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GenError, Result};
use crate::extract::{AccessorGroup, AccessorPair, Extracted, InterfaceSet, InterfaceSpec, PackageResult};
use crate::parser::ImportSpec;

/// Banner used when none is configured.
pub const DEFAULT_BANNER: &str = "this file was generated by structgen";

/// Matches package qualifiers such as `time.` in `*time.Time`.
static QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\.[A-Za-z_]").expect("valid regex"));

/// Immutable settings for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// First line of the generated file header.
    pub banner: String,
    /// Generation time written under the banner; omitted when None.
    pub timestamp: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_string(),
            timestamp: None,
        }
    }
}

impl RenderOptions {
    /// Options stamped with the current local time.
    pub fn stamped(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
            timestamp: Some(
                chrono::Local::now()
                    .format("%Y-%m-%d %H:%M:%S %z")
                    .to_string(),
            ),
        }
    }
}

/// Renders package results into unformatted Go text.
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render one package result.
    pub fn render(&self, result: &PackageResult) -> Result<String> {
        match &result.extracted {
            Extracted::Interfaces(set) => self.render_interfaces(set),
            Extracted::Accessors(groups) => {
                self.render_accessors(&result.package, &result.imports, groups)
            }
        }
    }

    /// Render every interface of a package, ordered by derived name.
    pub fn render_interfaces(&self, set: &InterfaceSet) -> Result<String> {
        let mut out = String::new();
        for spec in set.sorted() {
            write_interface(&mut out, spec)?;
        }
        Ok(out)
    }

    /// Render the accessor file for a package.
    pub fn render_accessors(
        &self,
        package: &str,
        imports: &[ImportSpec],
        groups: &[AccessorGroup],
    ) -> Result<String> {
        let mut out = String::new();
        self.write_header(&mut out, package)?;
        write_imports(&mut out, &used_imports(imports, groups))?;
        for group in groups {
            write_group(&mut out, group)?;
        }
        Ok(out)
    }

    fn write_header(&self, out: &mut String, package: &str) -> Result<()> {
        writeln!(out, "// {}", self.options.banner)?;
        if let Some(timestamp) = &self.options.timestamp {
            writeln!(out, "// {}", timestamp)?;
        }
        writeln!(out)?;
        writeln!(out, "package {}", package)?;
        Ok(())
    }
}

fn write_interface(out: &mut String, spec: &InterfaceSpec) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "// {} was extracted from {}",
        spec.derived_name, spec.original_type_name
    )?;
    writeln!(out, "type {} interface {{", spec.derived_name)?;
    for (name, signature) in spec.sorted_methods() {
        writeln!(out, "\t{}{}", name, signature)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_imports(out: &mut String, imports: &[&ImportSpec]) -> Result<()> {
    if imports.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "import (")?;
    for import in imports {
        match &import.alias {
            Some(alias) => writeln!(out, "\t{} {:?}", alias, import.path)?,
            None => writeln!(out, "\t{:?}", import.path)?,
        }
    }
    writeln!(out, ")")?;
    Ok(())
}

fn write_group(out: &mut String, group: &AccessorGroup) -> Result<()> {
    if group.pairs.is_empty() {
        return Err(GenError::Extraction(format!(
            "struct {} reached the renderer without fields",
            group.owner_type_name
        )));
    }
    writeln!(out)?;
    writeln!(out, "/*")?;
    writeln!(
        out,
        " * Getters and setters for struct type {}",
        group.owner_type_name
    )?;
    writeln!(out, " */")?;
    for pair in &group.pairs {
        write_getter(out, group, pair)?;
        write_setter(out, group, pair)?;
    }
    Ok(())
}

fn write_getter(out: &mut String, group: &AccessorGroup, pair: &AccessorPair) -> Result<()> {
    let recv = &group.receiver_name;
    let owner = &group.owner_type_name;
    writeln!(out)?;
    writeln!(
        out,
        "// {} returns {}.{}",
        pair.getter_name, owner, pair.field.name
    )?;
    writeln!(
        out,
        "func ({} {}) {}{} {{",
        recv, owner, pair.getter_name, pair.getter_signature
    )?;
    writeln!(out, "\treturn {}.{}", recv, pair.field.name)?;
    writeln!(out, "}}")?;
    Ok(())
}

fn write_setter(out: &mut String, group: &AccessorGroup, pair: &AccessorPair) -> Result<()> {
    let recv = &group.receiver_name;
    let owner = &group.owner_type_name;
    let field = &pair.field.name;
    writeln!(out)?;
    writeln!(
        out,
        "// {} sets {}.{} and returns *{}",
        pair.setter_name, owner, field, owner
    )?;
    writeln!(
        out,
        "func ({} *{}) {}{} {{",
        recv, owner, pair.setter_name, pair.setter_signature
    )?;
    writeln!(out, "\t{}.{} = {}", recv, field, field)?;
    writeln!(out, "\treturn {}", recv)?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Imports whose package name qualifies a rendered field type, by path.
fn used_imports<'a>(imports: &'a [ImportSpec], groups: &[AccessorGroup]) -> Vec<&'a ImportSpec> {
    let qualifiers: BTreeSet<&str> = groups
        .iter()
        .flat_map(|g| g.pairs.iter())
        .flat_map(|p| QUALIFIER.captures_iter(&p.field.declared_type))
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let mut used: Vec<&ImportSpec> = imports
        .iter()
        .filter(|i| i.package_name().is_some_and(|name| qualifiers.contains(name)))
        .collect();
    used.sort_by(|a, b| a.path.cmp(&b.path));
    used.dedup_by(|a, b| a.path == b.path);
    used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_interfaces, generate_accessors};
    use crate::scan::{FieldSpec, MethodSignature, StructDecl};

    fn method(owner: &str, name: &str, params: &str, results: &str) -> MethodSignature {
        MethodSignature {
            name: name.to_string(),
            parameters: params.to_string(),
            results: results.to_string(),
            owner_type_name: owner.to_string(),
            has_pointer_receiver: false,
        }
    }

    fn decl(name: &str, fields: &[(&str, &str)]) -> StructDecl {
        StructDecl {
            name: name.to_string(),
            fields: fields
                .iter()
                .enumerate()
                .map(|(i, (n, t))| FieldSpec {
                    name: n.to_string(),
                    declared_type: t.to_string(),
                    owner_type_name: name.to_string(),
                    declaration_order: i,
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_interfaces_sorted() {
        let set = extract_interfaces(
            &[
                method("Foo", "Do", "()", "String"),
                method("Bar", "SetStuff", "(i int)", "*Bar"),
                method("Bar", "AddThings", "(things ...string)", "*Bar"),
                method("Bar", "ReturnString", "()", "string"),
            ],
            "Interface",
        );
        let text = Renderer::new(RenderOptions::default())
            .render_interfaces(&set)
            .unwrap();
        let expected = "
// BarInterface was extracted from Bar
type BarInterface interface {
\tAddThings(things ...string) *Bar
\tReturnString() string
\tSetStuff(i int) *Bar
}

// FooInterface was extracted from Foo
type FooInterface interface {
\tDo() String
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_accessors() {
        let groups = generate_accessors(&[decl("Point", &[("X", "int"), ("Y", "int")])]).unwrap();
        let options = RenderOptions {
            banner: "generated".to_string(),
            timestamp: Some("2024-01-02 03:04:05 +0000".to_string()),
        };
        let text = Renderer::new(options)
            .render_accessors("shapes", &[], &groups)
            .unwrap();

        assert!(text.starts_with("// generated\n// 2024-01-02 03:04:05 +0000\n\npackage shapes\n"));
        assert!(text.contains(" * Getters and setters for struct type Point\n"));
        assert!(text.contains("func (point Point) X() int {\n\treturn point.X\n}\n"));
        assert!(text.contains(
            "func (point *Point) SetX(X int) *Point {\n\tpoint.X = X\n\treturn point\n}\n"
        ));
        let x = text.find("SetX").unwrap();
        let y = text.find(") Y()").unwrap();
        assert!(x < y, "X accessors come before Y accessors");
        assert!(!text.contains("import"));
    }

    #[test]
    fn test_render_without_timestamp() {
        let groups = generate_accessors(&[decl("A", &[("a", "int")])]).unwrap();
        let text = Renderer::new(RenderOptions::default())
            .render_accessors("p", &[], &groups)
            .unwrap();
        assert!(text.starts_with(&format!("// {}\n\npackage p\n", DEFAULT_BANNER)));
    }

    #[test]
    fn test_only_referenced_imports_are_emitted() {
        let imports = vec![
            ImportSpec { alias: None, path: "fmt".into() },
            ImportSpec { alias: None, path: "time".into() },
            ImportSpec { alias: Some("yaml".into()), path: "gopkg.in/yaml.v3".into() },
        ];
        let groups = generate_accessors(&[decl(
            "Event",
            &[("at", "*time.Time"), ("raw", "map[string]yaml.Node")],
        )])
        .unwrap();
        let text = Renderer::new(RenderOptions::default())
            .render_accessors("events", &imports, &groups)
            .unwrap();
        assert!(text.contains("import (\n\tyaml \"gopkg.in/yaml.v3\"\n\t\"time\"\n)\n"));
        assert!(!text.contains("\"fmt\""));
    }

    #[test]
    fn test_empty_group_rejected() {
        let group = AccessorGroup {
            owner_type_name: "Empty".to_string(),
            receiver_name: "empty".to_string(),
            pairs: vec![],
        };
        let err = Renderer::new(RenderOptions::default())
            .render_accessors("p", &[], &[group])
            .unwrap_err();
        assert_eq!(err.stage(), "extract");
    }
}
