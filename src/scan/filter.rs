//! Type-name filter applied by the scanner.

use std::collections::BTreeSet;

use crate::error::{GenError, Result};
use crate::naming::is_identifier;

/// Restricts scanning to a set of type names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Every qualifying type.
    #[default]
    All,
    /// Only the named types.
    Only(BTreeSet<String>),
}

impl TypeFilter {
    /// Parse a comma separated list such as `Foo, Bar`.
    ///
    /// Spaces are ignored. An empty list or `*` selects all types.
    pub fn parse(list: &str) -> Result<Self> {
        let cleaned: String = list.chars().filter(|c| !c.is_whitespace()).collect();
        Self::from_names(cleaned.split(',').filter(|s| !s.is_empty()))
    }

    /// Build a filter from individual names.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name == "*" {
                return Ok(TypeFilter::All);
            }
            if !is_identifier(name) {
                return Err(GenError::InvalidTarget(format!(
                    "type filter entry {:?} is not a valid type name",
                    name
                )));
            }
            set.insert(name.to_string());
        }
        if set.is_empty() {
            Ok(TypeFilter::All)
        } else {
            Ok(TypeFilter::Only(set))
        }
    }

    /// Whether records for `type_name` should be emitted.
    pub fn allows(&self, type_name: &str) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(names) => names.contains(type_name),
        }
    }

    /// Names in the filter that are not in `seen`, sorted.
    pub fn unmatched<I, S>(&self, seen: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self {
            TypeFilter::All => Vec::new(),
            TypeFilter::Only(names) => {
                let seen: BTreeSet<String> =
                    seen.into_iter().map(|s| s.as_ref().to_string()).collect();
                names.difference(&seen).cloned().collect()
            }
        }
    }
}
