//! Go grammar glue for tree-sitter.
//!
//! Parses source files into trees and pulls out the two file-level facts
//! the walker needs: the package clause and the import list.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use super::{ImportSpec, ParsedFile};
use crate::error::{GenError, Result};

/// Tree-sitter query for the package clause.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Tree-sitter query for import specs, both single and grouped.
///
/// Captures:
/// - `alias`: explicit package name, `.` or `_` (optional)
/// - `path`: the quoted import path
const IMPORT_QUERY: &str = r#"
(import_spec
  name: (_)? @alias
  path: (_) @path
)
"#;

/// The tree-sitter Go language.
pub fn language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Create a tree-sitter parser configured for Go.
pub fn create_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|e| GenError::Extraction(format!("cannot load Go grammar: {}", e)))?;
    Ok(parser)
}

/// Go source parser with precompiled queries.
pub struct GoParser {
    language: Language,
    package_query: Query,
    import_query: Query,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Result<Self> {
        let language = language();
        let package_query = Query::new(&language, PACKAGE_QUERY)
            .map_err(|e| GenError::Extraction(format!("invalid package query: {}", e)))?;
        let import_query = Query::new(&language, IMPORT_QUERY)
            .map_err(|e| GenError::Extraction(format!("invalid import query: {}", e)))?;
        Ok(Self {
            language,
            package_query,
            import_query,
        })
    }

    /// Parse a source file, rejecting trees that contain syntax errors.
    pub fn parse(&self, path: &Path, source: Vec<u8>) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| GenError::parse(path, e.to_string()))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| GenError::parse(path, "parser produced no tree"))?;

        if let Some(message) = describe_first_error(tree.root_node(), &source) {
            return Err(GenError::parse(path, message));
        }

        Ok(ParsedFile {
            tree,
            source,
            path: path.to_path_buf(),
        })
    }

    /// Extract the package name from a parsed file.
    pub fn package_name(&self, parsed: &ParsedFile) -> Option<String> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(
            &self.package_query,
            parsed.tree.root_node(),
            &parsed.source[..],
        );

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = self.package_query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }

    /// Extract the imports declared by a parsed file.
    pub fn imports(&self, parsed: &ParsedFile) -> Vec<ImportSpec> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(
            &self.import_query,
            parsed.tree.root_node(),
            &parsed.source[..],
        );

        let mut imports = Vec::new();
        while let Some(m) = matches.next() {
            let mut alias = None;
            let mut path = None;
            for capture in m.captures {
                match self.import_query.capture_names()[capture.index as usize] {
                    "alias" => alias = Some(parsed.node_text(capture.node).to_string()),
                    "path" => {
                        let raw = parsed.node_text(capture.node);
                        path = Some(raw.trim_matches(|c| c == '"' || c == '`').to_string());
                    }
                    _ => {}
                }
            }
            if let Some(path) = path {
                imports.push(ImportSpec { alias, path });
            }
        }
        imports
    }
}

/// Check that `source` is syntactically valid Go.
///
/// Returns a description of the first syntax error otherwise.
pub fn check_syntax(source: &str) -> std::result::Result<(), String> {
    let mut parser = create_parser().map_err(|e| e.to_string())?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "parser produced no tree".to_string())?;
    match describe_first_error(tree.root_node(), source.as_bytes()) {
        Some(message) => Err(message),
        None => Ok(()),
    }
}

/// Describe the first ERROR or MISSING node under `root`, if any.
fn describe_first_error(root: Node, source: &[u8]) -> Option<String> {
    let node = first_error(root)?;
    let pos = node.start_position();
    let detail = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let text = node.utf8_text(source).unwrap_or("");
        let snippet: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let snippet: String = snippet.chars().take(40).collect();
        format!("unexpected {:?}", snippet)
    };
    Some(format!("{}:{}: {}", pos.row + 1, pos.column + 1, detail))
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<ParsedFile> {
        GoParser::new()?.parse(Path::new("test.go"), source.as_bytes().to_vec())
    }

    #[test]
    fn test_package_name() {
        let parser = GoParser::new().unwrap();
        let parsed = parser
            .parse(Path::new("a.go"), b"package shapes\n\ntype Point struct{}\n".to_vec())
            .unwrap();
        assert_eq!(parser.package_name(&parsed).as_deref(), Some("shapes"));
    }

    #[test]
    fn test_imports() {
        let source = r#"
package main

import "fmt"

import (
    "time"
    yaml "gopkg.in/yaml.v3"
    _ "embed"
)
"#;
        let parser = GoParser::new().unwrap();
        let parsed = parse(source).unwrap();
        let imports = parser.imports(&parsed);
        let paths: Vec<_> = imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["fmt", "time", "gopkg.in/yaml.v3", "embed"]);
        assert_eq!(imports[2].alias.as_deref(), Some("yaml"));
        assert_eq!(imports[3].alias.as_deref(), Some("_"));
    }

    #[test]
    fn test_syntax_error_is_reported_with_position() {
        let err = parse("package main\n\nfunc broken( {\n").err().unwrap();
        match err {
            GenError::Parse { path, message } => {
                assert_eq!(path, Path::new("test.go"));
                assert!(message.contains(':'), "expected a position, got {}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_syntax() {
        assert!(check_syntax("type A interface {\n\tDo() string\n}\n").is_ok());
        assert!(check_syntax("type A interface {\n\tDo() string\n").is_err());
    }
}
